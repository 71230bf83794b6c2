//! Rule-driven simplification engine
//!
//! Applies a [`RuleSet`] to a tree in place. Per node the phases run in a
//! fixed order:
//!
//! 1. pre-children removal (elements)
//! 2. pre-children actions (elements)
//! 3. children, from a snapshot taken after the actions
//! 4. node removal (any node)
//! 5. unfold (elements), followed by a full re-run on every promoted child
//!
//! The traversal uses an explicit work stack, so tree depth is bounded by
//! memory rather than by the call stack.

mod options;
mod simplifier;

pub use options::{SimplifyOptions, SimplifyOutcome, SimplifyStats};
pub use simplifier::Simplifier;

use crate::errors::Result;
use crate::rules::RuleSet;
use crate::tree::DomTree;

/// Simplify the tree rooted at `root` with default options, reporting
/// matches through `tracing`
///
/// Returns the root id. The root itself can never be removed or unfolded;
/// a rule that tries is a fatal error.
///
/// # Errors
///
/// * `RuleFault` - A predicate or action failed
/// * `RootRemoved` / `UnfoldRoot` - A rule matched the root
/// * `ActionDetachedNode` - An action detached its own element
pub fn simplify<T: DomTree>(tree: &mut T, root: T::NodeId, rules: &RuleSet<T>) -> Result<T::NodeId> {
    Simplifier::new(rules).run(tree, root).map(|outcome| outcome.root)
}
