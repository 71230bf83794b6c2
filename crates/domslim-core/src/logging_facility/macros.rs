//! Canonical logging macros
//!
//! Every event carries `component`, `op` and `event`; extra fields are
//! passed through in `tracing` field syntax.

#[doc(hidden)]
#[macro_export]
macro_rules! __domslim_event {
    ($level:expr, $op:expr, $event:expr; $($field:tt)*) => {
        tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use domslim_core::log_op_start;
/// log_op_start!("simplify");
/// log_op_start!("simplify", rules = 4);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__domslim_event!(
            tracing::Level::INFO,
            $op,
            $crate::domslim_core_types::schema::EVENT_START;
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use domslim_core::log_op_end;
/// log_op_end!("simplify", duration_ms = 42);
/// log_op_end!("simplify", duration_ms = 42, visited = 7);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__domslim_event!(
            tracing::Level::INFO,
            $op,
            $crate::domslim_core_types::schema::EVENT_END;
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation
///
/// `err` is anything convertible into [`ExError`](crate::errors::ExError);
/// its kind, stable code and message are recorded as `err_kind`,
/// `err_code` and `err_message`.
///
/// ```
/// # use domslim_core::{log_op_error, errors::DomSlimError};
/// let err = DomSlimError::UnfoldRoot { node: "#0".to_string() };
/// log_op_error!("simplify", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__domslim_event!(
            tracing::Level::ERROR,
            $op,
            $crate::domslim_core_types::schema::EVENT_END_ERROR;
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
            $($($field)*)?
        )
    }};
}

/// Log a rule match inside a simplification pass
///
/// `node` and `origin` are recorded with their `Debug` form.
///
/// ```
/// # use domslim_core::log_rule_match;
/// log_rule_match!("unfold", "Unfold wrappers", 3usize, Some(7usize));
/// ```
#[macro_export]
macro_rules! log_rule_match {
    ($phase:expr, $rule:expr, $node:expr, $origin:expr $(, $($field:tt)*)?) => {
        $crate::__domslim_event!(
            tracing::Level::INFO,
            "simplify",
            $crate::domslim_core_types::schema::EVENT_RULE_MATCH;
            phase = $phase,
            rule = $rule,
            node = ?$node,
            origin = ?$origin,
            $($($field)*)?
        )
    };
}
