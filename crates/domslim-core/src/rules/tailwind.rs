//! Utility-class filtering for Tailwind-styled pages

/// Class prefixes treated as Tailwind utilities
pub const TAILWIND_CLASS_PREFIXES: &[&str] = &[
    "sm:", "md:", "lg:", "xl:", "2xl:", "xs:", "nd:", "hover:", "focus:", "active:",
    "disabled:", "checked:", "group-hover:", "group-focus:", "focus-within:", "focus-visible:",
    "dark:", "light:", "motion-safe:", "motion-reduce:", "portrait:", "landscape:", "first:",
    "last:", "odd:", "even:", "only:", "target:", "default:", "indeterminate:", "required:",
    "valid:", "invalid:", "placeholder-shown:", "autofill:", "read-only:", "empty:", "before:",
    "after:", "first-line:", "first-letter:", "marker:", "selection:", "file:", "backdrop:",
    "container", "block", "inline", "inline-block", "flex", "inline-flex", "grid",
    "inline-grid", "table", "hidden", "static", "fixed", "absolute", "relative", "sticky",
    "inset-", "top-", "right-", "bottom-", "left-", "z-", "float-", "clear-", "m-", "mt-",
    "mr-", "mb-", "ml-", "mx-", "my-", "p-", "pt-", "pr-", "pb-", "pl-", "px-", "py-", "gap-",
    "space-x-", "space-y-", "w-", "min-w-", "max-w-", "h-", "min-h-", "max-h-", "aspect-",
    "font-", "text-", "align-", "leading-", "tracking-", "underline", "line-through",
    "no-underline", "uppercase", "lowercase", "capitalize", "truncate", "text-ellipsis",
    "text-clip", "list-", "bg-", "bg-gradient-to-", "from-", "via-", "to-", "bg-opacity-",
    "border-", "border-t-", "border-dashed", "border-dotted", "rounded-", "rounded-t-",
    "rounded-b-", "divide-x-", "divide-y-", "divide-", "ring-", "ring-offset-", "shadow-",
    "opacity-", "mix-blend-", "bg-blend-", "transition-", "duration-", "ease-", "delay-",
    "animate-", "transform", "scale-", "rotate-", "translate-x-", "skew-x-", "origin-",
    "cursor-", "resize-", "scroll-", "snap-", "overscroll-", "select-", "fill-", "stroke-",
    "stroke-w-", "sr-only", "not-sr-only", "table-", "border-collapse", "border-spacing-",
    "flex-", "flex-row", "flex-col", "flex-wrap", "order-", "grow-", "shrink-", "grid-cols-",
    "grid-rows-", "col-", "row-", "auto-cols-", "auto-rows-", "columns-", "filter", "blur-",
    "brightness-", "contrast-", "backdrop-filter", "backdrop-blur-", "no-visited", "visible",
    "invisible", "prose", "form-", "line-clamp-", "enabled:", "embed-s:", "items-center",
    "pointer-events", "justify-center", "overflow-", "-", "[", "whitespace-", "justify-", "s:",
];

pub fn is_tailwind_class(class: &str) -> bool {
    TAILWIND_CLASS_PREFIXES
        .iter()
        .any(|prefix| class.starts_with(prefix))
}

/// Drop utility classes from a space-separated class list
///
/// Splits on single spaces only, so classes joined by newlines survive as a
/// unit; empty entries are dropped.
pub fn filter_tailwind_classes(class: &str) -> String {
    class
        .split(' ')
        .filter(|c| !c.is_empty() && !is_tailwind_class(c))
        .collect::<Vec<_>>()
        .join(" ")
}
