use std::collections::HashMap;
use std::time::Instant;

use domslim_core_types::RunId;

use super::options::{SimplifyOptions, SimplifyOutcome, SimplifyStats};
use crate::errors::{DomSlimError, Result};
use crate::report::{MatchReporter, Phase, RuleMatch, TracingReporter};
use crate::rules::RuleSet;
use crate::tree::{DomTree, NodeKind};
use crate::{log_op_end, log_op_error, log_op_start, ops};

/// Unit of pending work. `parent` is the parent the node had when the frame
/// was scheduled; a node that has since moved or been detached is skipped.
enum Frame<N> {
    /// Phases A-C
    Enter { node: N, parent: Option<N> },
    /// Phases D-E
    Exit { node: N, parent: Option<N> },
}

/// Configured engine: a rule set, options and a match reporter
pub struct Simplifier<'r, T: DomTree, R: MatchReporter<T> = TracingReporter> {
    rules: &'r RuleSet<T>,
    options: SimplifyOptions,
    reporter: R,
}

impl<'r, T: DomTree> Simplifier<'r, T, TracingReporter> {
    pub fn new(rules: &'r RuleSet<T>) -> Self {
        Self {
            rules,
            options: SimplifyOptions::default(),
            reporter: TracingReporter,
        }
    }
}

impl<'r, T: DomTree, R: MatchReporter<T>> Simplifier<'r, T, R> {
    pub fn with_options(mut self, options: SimplifyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_reporter<R2: MatchReporter<T>>(self, reporter: R2) -> Simplifier<'r, T, R2> {
        Simplifier {
            rules: self.rules,
            options: self.options,
            reporter,
        }
    }

    pub fn options(&self) -> &SimplifyOptions {
        &self.options
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Run a full pass over the tree rooted at `root`
    ///
    /// # Errors
    ///
    /// * `RuleFault` - A predicate or action failed
    /// * `RootRemoved` - A removal rule matched `root`
    /// * `UnfoldRoot` - An unfold rule matched `root`
    /// * `ActionDetachedNode` - An action detached its own element
    /// * `VisitBudgetExceeded` - A node was re-entered too often
    pub fn run(&mut self, tree: &mut T, root: T::NodeId) -> Result<SimplifyOutcome<T::NodeId>> {
        let run_id = RunId::new();
        let span = tracing::info_span!("simplify", run_id = %run_id);
        let _guard = span.enter();

        let start = Instant::now();
        log_op_start!("simplify", root = ?root, rules = self.rules.len());

        match self.drive(tree, root) {
            Ok((stats, _)) => {
                log_op_end!(
                    "simplify",
                    duration_ms = start.elapsed().as_millis() as u64,
                    visited = stats.visited,
                    removed = stats.removed(),
                    unfolded = stats.unfolded,
                );
                Ok(SimplifyOutcome { root, stats })
            }
            Err(err) => {
                log_op_error!(
                    "simplify",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    /// Process the subtree at `node`, which may sit anywhere in the tree
    ///
    /// Returns `true` if the node is still attached where it was, `false`
    /// if a rule removed or unfolded it.
    ///
    /// # Errors
    ///
    /// Same as [`Simplifier::run`].
    pub fn process(&mut self, tree: &mut T, node: T::NodeId) -> Result<bool> {
        self.drive(tree, node).map(|(_, retained)| retained)
    }

    fn drive(&mut self, tree: &mut T, start: T::NodeId) -> Result<(SimplifyStats, bool)> {
        let mut stats = SimplifyStats::default();
        let mut visits: HashMap<T::NodeId, u32> = HashMap::new();
        let mut retained = true;
        let mut stack = vec![Frame::Enter {
            node: start,
            parent: tree.parent(start),
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter { node, parent } => {
                    if tree.parent(node) != parent {
                        continue;
                    }
                    self.count_visit(tree, &mut visits, node)?;
                    stats.visited += 1;

                    match self.enter(tree, node, &mut stats)? {
                        Some(children) => {
                            stack.push(Frame::Exit { node, parent });
                            stack.extend(children.into_iter().rev().map(|child| Frame::Enter {
                                node: child,
                                parent: Some(node),
                            }));
                        }
                        None => {
                            if node == start {
                                retained = false;
                            }
                        }
                    }
                }
                Frame::Exit { node, parent } => {
                    if tree.parent(node) != parent {
                        continue;
                    }
                    let promoted = self.exit(tree, node, &mut stats)?;
                    if node == start && tree.parent(node) != parent {
                        retained = false;
                    }
                    if let Some(promoted) = promoted {
                        stack.extend(promoted.into_iter().rev().map(|child| Frame::Enter {
                            node: child,
                            parent,
                        }));
                    }
                }
            }
        }

        Ok((stats, retained))
    }

    /// Phases A and B. Returns the child snapshot to descend into, or `None`
    /// if the element was removed.
    fn enter(
        &mut self,
        tree: &mut T,
        node: T::NodeId,
        stats: &mut SimplifyStats,
    ) -> Result<Option<Vec<T::NodeId>>> {
        let rules = self.rules;

        match tree.kind(node)? {
            NodeKind::Element => {
                for rule in &rules.element_remove_pre_children_rules {
                    if rule.should_remove(tree, node)? {
                        self.report(tree, Phase::PreChildrenRemoval, &rule.name, rule.log, node);
                        remove(tree, node, &rule.name)?;
                        stats.removed_pre_children += 1;
                        return Ok(None);
                    }
                }

                let parent = tree.parent(node);
                for action in &rules.pre_children_actions {
                    action.run(tree, node)?;
                    stats.actions_run += 1;
                    if tree.parent(node) != parent {
                        return Err(DomSlimError::ActionDetachedNode {
                            action: action.name.clone(),
                            node: tree.describe(node),
                        });
                    }
                }
            }
            NodeKind::Text | NodeKind::Other => {}
        }

        Ok(Some(tree.children(node)?))
    }

    /// Phases D and E. Returns the promoted children if the node was unfolded.
    fn exit(
        &mut self,
        tree: &mut T,
        node: T::NodeId,
        stats: &mut SimplifyStats,
    ) -> Result<Option<Vec<T::NodeId>>> {
        let rules = self.rules;

        for rule in &rules.node_remove_rules {
            if rule.should_remove(tree, node)? {
                self.report(tree, Phase::NodeRemoval, &rule.name, rule.log, node);
                remove(tree, node, &rule.name)?;
                stats.removed_post_children += 1;
                return Ok(None);
            }
        }

        match tree.kind(node)? {
            NodeKind::Element => {
                for rule in &rules.element_unfold_rules {
                    if rule.should_unfold(tree, node)? {
                        self.report(tree, Phase::Unfold, &rule.name, rule.log, node);
                        let promoted = ops::unfold(tree, node, rule.merge_selection())?;
                        stats.unfolded += 1;
                        return Ok(Some(promoted));
                    }
                }
            }
            NodeKind::Text | NodeKind::Other => {}
        }

        Ok(None)
    }

    fn count_visit(
        &self,
        tree: &T,
        visits: &mut HashMap<T::NodeId, u32>,
        node: T::NodeId,
    ) -> Result<()> {
        let Some(budget) = self.options.max_visits_per_node else {
            return Ok(());
        };
        let count = visits.entry(node).or_insert(0);
        *count += 1;
        if *count > budget {
            return Err(DomSlimError::VisitBudgetExceeded {
                node: tree.describe(node),
                budget,
            });
        }
        Ok(())
    }

    fn report(&mut self, tree: &T, phase: Phase, rule: &str, log: bool, node: T::NodeId) {
        if !(log && self.options.log_matches) {
            return;
        }
        self.reporter.report(&RuleMatch {
            phase,
            rule,
            node,
            origin: tree.origin(node),
            label: tree.describe(node),
        });
    }
}

/// Detach a matched node; a parentless node is the pass root
fn remove<T: DomTree>(tree: &mut T, node: T::NodeId, rule: &str) -> Result<()> {
    if tree.parent(node).is_none() {
        return Err(DomSlimError::RootRemoved {
            node: tree.describe(node),
            rule: rule.to_string(),
        });
    }
    tree.detach(node)
}
