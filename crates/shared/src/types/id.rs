//! Typed IDs for type-safe entity references.
//!
//! Every deferred-content mount carries a `MountId` so its log lines can be
//! correlated from first render to teardown.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Unique identifier for one mount of a deferred content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MountId(pub Uuid);

impl MountId {
    /// Creates a new random ID using UUID v7 (time-ordered).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
