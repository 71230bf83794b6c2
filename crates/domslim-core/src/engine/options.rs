/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// Fail once a single node has been entered more than this many times.
    /// Promoted children are re-entered once per unfolded ancestor, so the
    /// budget must exceed the deepest wrapper chain expected.
    pub max_visits_per_node: Option<u32>,
    /// Forward matches of rules with `log = true` to the reporter
    pub log_matches: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            max_visits_per_node: None,
            log_matches: true,
        }
    }
}

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    /// Node entries, including re-entries after promotion
    pub visited: usize,
    pub removed_pre_children: usize,
    pub removed_post_children: usize,
    pub unfolded: usize,
    pub actions_run: usize,
}

impl SimplifyStats {
    pub fn removed(&self) -> usize {
        self.removed_pre_children + self.removed_post_children
    }

    /// True when the pass changed the structure of the tree
    pub fn changed_structure(&self) -> bool {
        self.removed() > 0 || self.unfolded > 0
    }
}

/// Result of a full pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOutcome<N> {
    pub root: N,
    pub stats: SimplifyStats,
}
