use thiserror::Error;

/// Result type alias using DomSlimError
pub type Result<T> = std::result::Result<T, DomSlimError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and host-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Tree access
    NotFound,
    NotAnElement,
    InvalidInput,

    // Structural invariants
    CycleDetected,
    ReferenceNotChild,
    UnfoldRoot,
    RootRemoved,
    ActionDetachedNode,
    CloneMismatch,

    // Rule execution
    RuleFault,
    BudgetExceeded,

    // Integration
    InvalidSnapshot,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NODE_NOT_FOUND",
            ExErrorKind::NotAnElement => "ERR_NOT_AN_ELEMENT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::ReferenceNotChild => "ERR_REFERENCE_NOT_CHILD",
            ExErrorKind::UnfoldRoot => "ERR_UNFOLD_ROOT",
            ExErrorKind::RootRemoved => "ERR_ROOT_REMOVED",
            ExErrorKind::ActionDetachedNode => "ERR_ACTION_DETACHED_NODE",
            ExErrorKind::CloneMismatch => "ERR_CLONE_MISMATCH",
            ExErrorKind::RuleFault => "ERR_RULE_FAULT",
            ExErrorKind::BudgetExceeded => "ERR_BUDGET_EXCEEDED",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Flattened view of a `DomSlimError` with classification fields for
/// programmatic handling and the node/rule context needed to diagnose it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    node: Option<String>,
    rule: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            node: None,
            rule: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add node context
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Add rule context
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(node) = &self.node {
            write!(f, " (node: {})", node)?;
        }
        if let Some(rule) = &self.rule {
            write!(f, " (rule: {})", rule)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for tree access, structural invariants and rule execution
///
/// Node identities are carried as their display form so the error stays
/// independent of the concrete tree representation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomSlimError {
    // ===== Tree access =====
    /// Node id does not belong to the tree
    #[error("Node not found: {node}")]
    NodeNotFound { node: String },

    /// Element-only operation attempted on a text or other node
    #[error("Node is not an element: {node}")]
    NotAnElement { node: String },

    /// Text-only operation attempted on an element or other node
    #[error("Node is not a text node: {node}")]
    NotText { node: String },

    // ===== Structural invariants =====
    /// Inserting would make a node its own ancestor
    #[error("Cycle detected: cannot insert {node} under {parent}")]
    CycleDetected { node: String, parent: String },

    /// insert_before reference is not a child of the given parent
    #[error("Reference node {reference} is not a child of {parent}")]
    ReferenceNotChild { parent: String, reference: String },

    /// Unfold matched a node without a parent to promote into
    #[error("Cannot unfold {node}: node has no parent")]
    UnfoldRoot { node: String },

    /// A removal rule matched the root of the pass
    #[error("Rule '{rule}' removed the root node {node}")]
    RootRemoved { node: String, rule: String },

    /// A pre-children action detached or moved the node it was given
    #[error("Action '{action}' detached its own node {node}")]
    ActionDetachedNode { action: String, node: String },

    /// Cloned tree and source tree disagree on node count
    #[error("Clone node count mismatch: source has {source_count}, clone has {cloned_count}")]
    CloneCountMismatch {
        source_count: usize,
        cloned_count: usize,
    },

    // ===== Rule execution =====
    /// A predicate or action failed; always fatal for the pass
    #[error("Rule '{rule}' failed during {phase}: {message}")]
    RuleFault {
        rule: String,
        phase: String,
        message: String,
    },

    /// A node was entered more often than the configured budget allows
    #[error("Node {node} exceeded the visit budget of {budget}")]
    VisitBudgetExceeded { node: String, budget: u32 },

    // ===== Integration =====
    /// Page snapshot is structurally invalid
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl DomSlimError {
    /// Create a rule fault from inside a predicate or action
    ///
    /// The engine fills in the rule name and phase when the fault crosses
    /// the rule boundary.
    pub fn rule_fault(message: impl Into<String>) -> Self {
        DomSlimError::RuleFault {
            rule: String::new(),
            phase: String::new(),
            message: message.into(),
        }
    }

    /// Attribute an error raised inside a rule to that rule and phase
    pub fn in_rule(self, rule: &str, phase: &str) -> Self {
        match self {
            DomSlimError::RuleFault {
                rule: existing,
                phase: existing_phase,
                message,
            } => DomSlimError::RuleFault {
                rule: if existing.is_empty() {
                    rule.to_string()
                } else {
                    existing
                },
                phase: if existing_phase.is_empty() {
                    phase.to_string()
                } else {
                    existing_phase
                },
                message,
            },
            other => DomSlimError::RuleFault {
                rule: rule.to_string(),
                phase: phase.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<DomSlimError> for ExError {
    fn from(err: DomSlimError) -> Self {
        match err {
            DomSlimError::NodeNotFound { node } => ExError::new(ExErrorKind::NotFound)
                .with_node(node)
                .with_message("Node does not belong to the tree"),

            DomSlimError::NotAnElement { node } => ExError::new(ExErrorKind::NotAnElement)
                .with_node(node)
                .with_message("Operation requires an element node"),

            DomSlimError::NotText { node } => ExError::new(ExErrorKind::InvalidInput)
                .with_node(node)
                .with_message("Operation requires a text node"),

            DomSlimError::CycleDetected { node, parent } => {
                ExError::new(ExErrorKind::CycleDetected)
                    .with_node(node)
                    .with_message(format!("Insertion under {} would create a cycle", parent))
            }

            DomSlimError::ReferenceNotChild { parent, reference } => {
                ExError::new(ExErrorKind::ReferenceNotChild)
                    .with_node(reference)
                    .with_message(format!("Reference is not a child of {}", parent))
            }

            DomSlimError::UnfoldRoot { node } => ExError::new(ExErrorKind::UnfoldRoot)
                .with_node(node)
                .with_message("Unfold target has no parent"),

            DomSlimError::RootRemoved { node, rule } => ExError::new(ExErrorKind::RootRemoved)
                .with_node(node)
                .with_rule(rule)
                .with_message("Removal rule matched the root"),

            DomSlimError::ActionDetachedNode { action, node } => {
                ExError::new(ExErrorKind::ActionDetachedNode)
                    .with_node(node)
                    .with_rule(action)
                    .with_message("Pre-children action detached its own node")
            }

            DomSlimError::CloneCountMismatch {
                source_count,
                cloned_count,
            } => ExError::new(ExErrorKind::CloneMismatch).with_message(format!(
                "source has {} nodes, clone has {}",
                source_count, cloned_count
            )),

            DomSlimError::RuleFault {
                rule,
                phase,
                message,
            } => ExError::new(ExErrorKind::RuleFault)
                .with_op(phase)
                .with_rule(rule)
                .with_message(message),

            DomSlimError::VisitBudgetExceeded { node, budget } => {
                ExError::new(ExErrorKind::BudgetExceeded)
                    .with_node(node)
                    .with_message(format!("Visit budget of {} exceeded", budget))
            }

            DomSlimError::InvalidSnapshot { reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(reason)
            }

            DomSlimError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to DomSlimError
impl From<serde_json::Error> for DomSlimError {
    fn from(err: serde_json::Error) -> Self {
        DomSlimError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_kind_codes() {
        let cases = [
            (ExErrorKind::UnfoldRoot, "ERR_UNFOLD_ROOT"),
            (ExErrorKind::RootRemoved, "ERR_ROOT_REMOVED"),
            (ExErrorKind::CloneMismatch, "ERR_CLONE_MISMATCH"),
            (ExErrorKind::RuleFault, "ERR_RULE_FAULT"),
            (ExErrorKind::BudgetExceeded, "ERR_BUDGET_EXCEEDED"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_rule_fault_gets_attributed() {
        let err = DomSlimError::rule_fault("boom").in_rule("Remove SVGs", "pre_children_removal");
        assert_eq!(
            err,
            DomSlimError::RuleFault {
                rule: "Remove SVGs".to_string(),
                phase: "pre_children_removal".to_string(),
                message: "boom".to_string(),
            }
        );
    }

    #[test]
    fn test_in_rule_keeps_existing_attribution() {
        let err = DomSlimError::rule_fault("inner")
            .in_rule("first", "unfold")
            .in_rule("second", "node_removal");
        match err {
            DomSlimError::RuleFault { rule, phase, .. } => {
                assert_eq!(rule, "first");
                assert_eq!(phase, "unfold");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_in_rule_wraps_tree_errors() {
        let err = DomSlimError::NodeNotFound {
            node: "#9".to_string(),
        }
        .in_rule("lookup", "unfold");
        match err {
            DomSlimError::RuleFault { message, .. } => {
                assert!(message.contains("#9"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ex_error_display_includes_context() {
        let ex: ExError = DomSlimError::RootRemoved {
            node: "#0".to_string(),
            rule: "Remove everything".to_string(),
        }
        .into();
        let text = ex.to_string();
        assert!(text.starts_with("[ERR_ROOT_REMOVED]"));
        assert!(text.contains("(node: #0)"));
        assert!(text.contains("(rule: Remove everything)"));
    }
}
