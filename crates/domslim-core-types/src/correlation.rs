//! Correlation ids for simplification passes
//!
//! Every engine run carries a `RunId` on its tracing span so that rule-match
//! events emitted deep inside a traversal can be grouped per pass.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one simplification pass; time-ordered (UUID v7)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
