//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Rule match fields
pub const FIELD_RULE: &str = "rule";
pub const FIELD_PHASE: &str = "phase";
pub const FIELD_NODE: &str = "node";
pub const FIELD_ORIGIN: &str = "origin";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_RULE_MATCH: &str = "rule_match";

// Engine phase names, in execution order
pub const PHASE_PRE_CHILDREN_REMOVAL: &str = "pre_children_removal";
pub const PHASE_PRE_CHILDREN_ACTION: &str = "pre_children_action";
pub const PHASE_NODE_REMOVAL: &str = "node_removal";
pub const PHASE_UNFOLD: &str = "unfold";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_RULE.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_RULE_MATCH.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
        assert_ne!(EVENT_RULE_MATCH, EVENT_END);
    }

    #[test]
    fn test_phase_names_are_distinct() {
        let phases = [
            PHASE_PRE_CHILDREN_REMOVAL,
            PHASE_PRE_CHILDREN_ACTION,
            PHASE_NODE_REMOVAL,
            PHASE_UNFOLD,
        ];
        for (i, a) in phases.iter().enumerate() {
            for b in &phases[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
