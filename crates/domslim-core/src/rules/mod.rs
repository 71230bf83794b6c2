//! Rule contracts and the ordered rule set consumed by the engine
//!
//! Predicates return a [`Verdict`]: `Some(true)` matches, `Some(false)` and
//! `None` (indeterminate) do not. An `Err` from a predicate or action is a
//! rule-authoring fault and aborts the whole pass.

pub mod basic;
pub mod tailwind;

use std::fmt;

use domslim_core_types::schema::{
    PHASE_NODE_REMOVAL, PHASE_PRE_CHILDREN_ACTION, PHASE_PRE_CHILDREN_REMOVAL, PHASE_UNFOLD,
};

use crate::errors::Result;
use crate::ops::PropertySelection;
use crate::tree::DomTree;

/// Predicate outcome; `None` is treated as no match
pub type Verdict = Option<bool>;

/// Boxed node predicate
pub type Predicate<T> = Box<dyn Fn(&T, <T as DomTree>::NodeId) -> Result<Verdict>>;

/// Boxed pre-children action
pub type ActionFn<T> = Box<dyn Fn(&mut T, <T as DomTree>::NodeId) -> Result<()>>;

/// Unfold an element: splice its children into its parent and drop it
pub struct ElementUnfoldRule<T: DomTree> {
    pub name: String,
    /// Report matches to the engine's reporter
    pub log: bool,
    /// Merge the unfolded element's attributes into promoted element children
    pub propagate_attributes: bool,
    pub properties: PropertySelection,
    should_unfold: Predicate<T>,
}

impl<T: DomTree> ElementUnfoldRule<T> {
    pub fn new<F>(name: impl Into<String>, should_unfold: F) -> Self
    where
        F: Fn(&T, T::NodeId) -> Result<Verdict> + 'static,
    {
        Self {
            name: name.into(),
            log: true,
            propagate_attributes: false,
            properties: PropertySelection::All,
            should_unfold: Box::new(should_unfold),
        }
    }

    /// Rule from an infallible boolean predicate
    pub fn when<F>(name: impl Into<String>, should_unfold: F) -> Self
    where
        F: Fn(&T, T::NodeId) -> bool + 'static,
    {
        Self::new(name, move |tree, node| Ok(Some(should_unfold(tree, node))))
    }

    pub fn silent(mut self) -> Self {
        self.log = false;
        self
    }

    pub fn propagate_attributes(mut self, propagate: bool) -> Self {
        self.propagate_attributes = propagate;
        self
    }

    pub fn properties(mut self, properties: PropertySelection) -> Self {
        self.properties = properties;
        self
    }

    /// Evaluate the predicate, attributing failures to this rule
    ///
    /// # Errors
    ///
    /// Returns `RuleFault` if the predicate fails.
    pub fn should_unfold(&self, tree: &T, element: T::NodeId) -> Result<bool> {
        (self.should_unfold)(tree, element)
            .map(|v| v.unwrap_or(false))
            .map_err(|e| e.in_rule(&self.name, PHASE_UNFOLD))
    }

    /// Selection to merge with, if this rule propagates attributes
    pub fn merge_selection(&self) -> Option<&PropertySelection> {
        self.propagate_attributes.then_some(&self.properties)
    }
}

/// Remove an element before its children are visited
pub struct ElementRemovePreChildrenRule<T: DomTree> {
    pub name: String,
    pub log: bool,
    should_remove: Predicate<T>,
}

impl<T: DomTree> ElementRemovePreChildrenRule<T> {
    pub fn new<F>(name: impl Into<String>, should_remove: F) -> Self
    where
        F: Fn(&T, T::NodeId) -> Result<Verdict> + 'static,
    {
        Self {
            name: name.into(),
            log: true,
            should_remove: Box::new(should_remove),
        }
    }

    pub fn when<F>(name: impl Into<String>, should_remove: F) -> Self
    where
        F: Fn(&T, T::NodeId) -> bool + 'static,
    {
        Self::new(name, move |tree, node| Ok(Some(should_remove(tree, node))))
    }

    pub fn silent(mut self) -> Self {
        self.log = false;
        self
    }

    /// # Errors
    ///
    /// Returns `RuleFault` if the predicate fails.
    pub fn should_remove(&self, tree: &T, element: T::NodeId) -> Result<bool> {
        (self.should_remove)(tree, element)
            .map(|v| v.unwrap_or(false))
            .map_err(|e| e.in_rule(&self.name, PHASE_PRE_CHILDREN_REMOVAL))
    }
}

/// Remove any node after its children have been processed
pub struct NodeRemoveRule<T: DomTree> {
    pub name: String,
    pub log: bool,
    should_remove: Predicate<T>,
}

impl<T: DomTree> NodeRemoveRule<T> {
    pub fn new<F>(name: impl Into<String>, should_remove: F) -> Self
    where
        F: Fn(&T, T::NodeId) -> Result<Verdict> + 'static,
    {
        Self {
            name: name.into(),
            log: true,
            should_remove: Box::new(should_remove),
        }
    }

    pub fn when<F>(name: impl Into<String>, should_remove: F) -> Self
    where
        F: Fn(&T, T::NodeId) -> bool + 'static,
    {
        Self::new(name, move |tree, node| Ok(Some(should_remove(tree, node))))
    }

    pub fn silent(mut self) -> Self {
        self.log = false;
        self
    }

    /// # Errors
    ///
    /// Returns `RuleFault` if the predicate fails.
    pub fn should_remove(&self, tree: &T, node: T::NodeId) -> Result<bool> {
        (self.should_remove)(tree, node)
            .map(|v| v.unwrap_or(false))
            .map_err(|e| e.in_rule(&self.name, PHASE_NODE_REMOVAL))
    }
}

/// Side effect run on every element before its children are visited
///
/// Actions may rewrite attributes or splice in content but must not detach
/// the element they are given.
pub struct PreChildrenAction<T: DomTree> {
    pub name: String,
    action: ActionFn<T>,
}

impl<T: DomTree> PreChildrenAction<T> {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut T, T::NodeId) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }

    /// # Errors
    ///
    /// Returns `RuleFault` if the action fails.
    pub fn run(&self, tree: &mut T, element: T::NodeId) -> Result<()> {
        (self.action)(tree, element).map_err(|e| e.in_rule(&self.name, PHASE_PRE_CHILDREN_ACTION))
    }
}

/// Ordered rule configuration; the engine's only input besides the tree
///
/// Within a phase rules are evaluated in registration order and the first
/// match wins. Actions all run, in order.
pub struct RuleSet<T: DomTree> {
    pub element_unfold_rules: Vec<ElementUnfoldRule<T>>,
    pub element_remove_pre_children_rules: Vec<ElementRemovePreChildrenRule<T>>,
    pub node_remove_rules: Vec<NodeRemoveRule<T>>,
    pub pre_children_actions: Vec<PreChildrenAction<T>>,
}

impl<T: DomTree> RuleSet<T> {
    pub fn new() -> Self {
        Self {
            element_unfold_rules: Vec::new(),
            element_remove_pre_children_rules: Vec::new(),
            node_remove_rules: Vec::new(),
            pre_children_actions: Vec::new(),
        }
    }

    pub fn with_unfold(mut self, rule: ElementUnfoldRule<T>) -> Self {
        self.element_unfold_rules.push(rule);
        self
    }

    pub fn with_pre_children_removal(mut self, rule: ElementRemovePreChildrenRule<T>) -> Self {
        self.element_remove_pre_children_rules.push(rule);
        self
    }

    pub fn with_node_removal(mut self, rule: NodeRemoveRule<T>) -> Self {
        self.node_remove_rules.push(rule);
        self
    }

    pub fn with_action(mut self, action: PreChildrenAction<T>) -> Self {
        self.pre_children_actions.push(action);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.element_unfold_rules.is_empty()
            && self.element_remove_pre_children_rules.is_empty()
            && self.node_remove_rules.is_empty()
            && self.pre_children_actions.is_empty()
    }

    /// Total number of rules and actions
    pub fn len(&self) -> usize {
        self.element_unfold_rules.len()
            + self.element_remove_pre_children_rules.len()
            + self.node_remove_rules.len()
            + self.pre_children_actions.len()
    }

    /// Rule and action names in phase execution order
    pub fn rule_names(&self) -> Vec<&str> {
        self.element_remove_pre_children_rules
            .iter()
            .map(|r| r.name.as_str())
            .chain(self.pre_children_actions.iter().map(|a| a.name.as_str()))
            .chain(self.node_remove_rules.iter().map(|r| r.name.as_str()))
            .chain(self.element_unfold_rules.iter().map(|r| r.name.as_str()))
            .collect()
    }
}

impl<T: DomTree> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DomTree> fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |v: Vec<&str>| v.join(", ");
        f.debug_struct("RuleSet")
            .field(
                "element_unfold_rules",
                &names(self.element_unfold_rules.iter().map(|r| r.name.as_str()).collect()),
            )
            .field(
                "element_remove_pre_children_rules",
                &names(
                    self.element_remove_pre_children_rules
                        .iter()
                        .map(|r| r.name.as_str())
                        .collect(),
                ),
            )
            .field(
                "node_remove_rules",
                &names(self.node_remove_rules.iter().map(|r| r.name.as_str()).collect()),
            )
            .field(
                "pre_children_actions",
                &names(self.pre_children_actions.iter().map(|a| a.name.as_str()).collect()),
            )
            .finish()
    }
}
