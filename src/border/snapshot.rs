//! Minimal persisted state of a border.
//!
//! Only what must survive a restart is kept: current values, the remaining
//! part of any transition, and the settings. Elapsed ticks and original
//! start values are not stored; a restored transition resumes linearly from
//! the current value.

use serde::{Deserialize, Serialize};

use super::BorderSettings;

/// Unfinished part of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingTransition<T> {
    /// Value the transition settles on.
    pub target: T,
    /// Ticks left before it settles.
    pub remaining_ticks: u64,
}

/// Serialisable border state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSnapshot {
    /// Edge length at capture time.
    pub size: f64,
    /// Center at capture time.
    pub center: [f64; 3],
    /// Remaining size transition, if one was running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_transition: Option<PendingTransition<f64>>,
    /// Remaining center transition, if one was running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_transition: Option<PendingTransition<[f64; 3]>>,
    /// Damage and warning settings.
    #[serde(default)]
    pub settings: BorderSettings,
}

impl BorderSnapshot {
    /// Encodes the snapshot as JSON.
    ///
    /// # Errors
    /// Returns an error if a value cannot be represented in JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a snapshot from JSON.
    ///
    /// # Errors
    /// Returns an error if `json` is not a valid snapshot document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
