//! Identifiers for the worlds that own borders.
//!
//! Each simulated world (dimension) owns at most one border. The tracker keys
//! its bookkeeping by [`WorldId`] and hands [`WorldHandle`]s back to listeners.

use std::fmt;

use serde::{Deserialize, Serialize};

/// World identifier with type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(
    /// Raw identifier.
    pub u64,
);

impl From<u64> for WorldId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl WorldId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle naming a world registered with a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldHandle {
    /// Identifier shared with the world's border.
    pub id: WorldId,
    /// Human readable name such as `"overworld"`.
    pub name: String,
}

impl WorldHandle {
    /// Builds a handle for `id` labelled `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lisiere::world_handle::{WorldHandle, WorldId};
    /// let handle = WorldHandle::new(WorldId(3), "the_end");
    /// assert_eq!(handle.to_string(), "the_end (#3)");
    /// ```
    pub fn new(id: impl Into<WorldId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for WorldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
