//! domslim core - rule-driven DOM simplification
//!
//! This crate reduces a captured page tree to the nodes that carry meaning,
//! including:
//! - An arena document model and the `DomTree` capability trait
//! - Four ordered rule kinds collected in a `RuleSet`
//! - The simplification engine (pre-children removal, actions, node
//!   removal, unfold with attribute propagation)
//! - Cloning with origin back-references and a layout classifier
//! - Snapshot loading and markup rendering

pub mod classify;
pub mod clone;
pub mod engine;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod render;
pub mod report;
pub mod rules;
pub mod snapshot;
pub mod traversal;
pub mod tree;

// Used by the logging macros
pub use domslim_core_types;

// Re-export commonly used types
pub use classify::{Classifier, LayoutClassifier};
pub use clone::deep_clone_with_references;
pub use engine::{simplify, Simplifier, SimplifyOptions, SimplifyOutcome, SimplifyStats};
pub use errors::{DomSlimError, ExError, ExErrorKind, Result};
pub use model::{Document, NodeId};
pub use report::{CollectingReporter, MatchReporter, NullReporter, TracingReporter};
pub use rules::basic::basic_rule_set;
pub use rules::{
    ElementRemovePreChildrenRule, ElementUnfoldRule, NodeRemoveRule, PreChildrenAction, RuleSet,
};
pub use snapshot::{LoadedPage, PageSnapshot};
pub use tree::{DomTree, NodeKind};
