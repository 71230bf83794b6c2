use std::collections::BTreeSet;

use crate::errors::Result;
use crate::tree::DomTree;

/// Which source attributes take part in a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PropertySelection {
    #[default]
    All,
    /// Explicit attribute names, matched case-insensitively
    Only(BTreeSet<String>),
}

impl PropertySelection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        PropertySelection::Only(
            names
                .into_iter()
                .map(|n| n.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            PropertySelection::All => true,
            PropertySelection::Only(names) => names.contains(&name.to_ascii_lowercase()),
        }
    }
}

/// Merge the selected attributes of `source` into `target`
///
/// A value already present on the target is kept and the source value is
/// appended after a single space; a missing attribute is copied verbatim.
/// Non-element targets are left untouched.
///
/// # Errors
///
/// Propagates attribute write failures from the tree.
pub fn concat_properties_from<T: DomTree>(
    tree: &mut T,
    source: T::NodeId,
    target: T::NodeId,
    selection: &PropertySelection,
) -> Result<()> {
    if !tree.is_element(target) {
        return Ok(());
    }

    for (name, value) in tree.attributes(source) {
        if !selection.includes(&name) {
            continue;
        }
        let merged = match tree.attribute(target, &name) {
            Some(existing) => format!("{} {}", existing, value),
            None => value,
        };
        tree.set_attribute(target, &name, &merged)?;
    }

    Ok(())
}
