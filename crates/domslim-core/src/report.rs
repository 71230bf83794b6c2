//! Rule match reporting
//!
//! The engine hands every logged match to a [`MatchReporter`]. Reporting is
//! observational only and never influences control flow.

use domslim_core_types::schema::{
    PHASE_NODE_REMOVAL, PHASE_PRE_CHILDREN_ACTION, PHASE_PRE_CHILDREN_REMOVAL, PHASE_UNFOLD,
};

use crate::log_rule_match;
use crate::tree::DomTree;

/// Engine phase a match happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PreChildrenRemoval,
    PreChildrenAction,
    NodeRemoval,
    Unfold,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreChildrenRemoval => PHASE_PRE_CHILDREN_REMOVAL,
            Phase::PreChildrenAction => PHASE_PRE_CHILDREN_ACTION,
            Phase::NodeRemoval => PHASE_NODE_REMOVAL,
            Phase::Unfold => PHASE_UNFOLD,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule match, borrowed from the engine for the duration of a report
#[derive(Debug)]
pub struct RuleMatch<'a, T: DomTree> {
    pub phase: Phase,
    pub rule: &'a str,
    pub node: T::NodeId,
    /// Origin of the node, when it was cloned from a source tree
    pub origin: Option<T::Origin>,
    pub label: String,
}

/// Sink for rule matches
pub trait MatchReporter<T: DomTree> {
    fn report(&mut self, m: &RuleMatch<'_, T>);
}

/// Emits one structured `tracing` event per match
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl<T: DomTree> MatchReporter<T> for TracingReporter {
    fn report(&mut self, m: &RuleMatch<'_, T>) {
        log_rule_match!(m.phase.as_str(), m.rule, m.node, m.origin, label = %m.label);
    }
}

/// Discards every match
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl<T: DomTree> MatchReporter<T> for NullReporter {
    fn report(&mut self, _m: &RuleMatch<'_, T>) {}
}

/// Owned copy of a match
#[derive(Debug, Clone)]
pub struct MatchRecord<T: DomTree> {
    pub phase: Phase,
    pub rule: String,
    pub node: T::NodeId,
    pub label: String,
}

/// Keeps every match in memory, in report order
#[derive(Debug)]
pub struct CollectingReporter<T: DomTree> {
    pub records: Vec<MatchRecord<T>>,
}

impl<T: DomTree> CollectingReporter<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Rule names in report order
    pub fn rule_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.rule.as_str()).collect()
    }

    pub fn count(&self, rule: &str) -> usize {
        self.records.iter().filter(|r| r.rule == rule).count()
    }
}

impl<T: DomTree> Default for CollectingReporter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DomTree> MatchReporter<T> for CollectingReporter<T> {
    fn report(&mut self, m: &RuleMatch<'_, T>) {
        self.records.push(MatchRecord {
            phase: m.phase,
            rule: m.rule.to_string(),
            node: m.node,
            label: m.label.clone(),
        });
    }
}

impl<T: DomTree, R: MatchReporter<T> + ?Sized> MatchReporter<T> for &mut R {
    fn report(&mut self, m: &RuleMatch<'_, T>) {
        (**self).report(m);
    }
}
