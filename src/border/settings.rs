//! Per-border damage and warning configuration.

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_DAMAGE_PER_BLOCK, DEFAULT_SAFE_ZONE, DEFAULT_WARNING_DISTANCE,
    DEFAULT_WARNING_TIME_SECS,
};

/// Scalars configuring the damage and warning collaborators. None of these
/// affect geometry.
///
/// # Examples
///
/// ```
/// use lisiere::border::BorderSettings;
/// let settings: BorderSettings = serde_json::from_str(r#"{ "safe_zone": 2.0 }"#).unwrap();
/// assert_eq!(settings.safe_zone, 2.0);
/// assert_eq!(settings, BorderSettings { safe_zone: 2.0, ..BorderSettings::default() });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSettings {
    /// Damage per unit of distance beyond the safe zone.
    pub damage_per_block: f64,
    /// Distance beyond the border tolerated before damage applies.
    pub safe_zone: f64,
    /// Distance from the border at which occupants are warned.
    pub warning_distance: f64,
    /// Seconds of approaching shrink motion that trigger a warning.
    pub warning_time_secs: u32,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            damage_per_block: DEFAULT_DAMAGE_PER_BLOCK,
            safe_zone: DEFAULT_SAFE_ZONE,
            warning_distance: DEFAULT_WARNING_DISTANCE,
            warning_time_secs: DEFAULT_WARNING_TIME_SECS,
        }
    }
}
