//! Scenario configuration for the headless binary.
//!
//! A JSON document lists worlds, their starting geometry and an optional
//! transition each, plus shared [`BorderSettings`]. Missing fields fall back
//! to the built-in two-world scenario's defaults.

use std::fs;
use std::path::Path;

use glam::DVec3;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::border::{BorderSettings, Occupant, RegionBorder};
use crate::error::{BorderError, ConfigError};
use crate::shape::{BoxBoundary, VerticalExtent};
use crate::world_handle::{WorldHandle, WorldId};

/// Default sampling density for the scenario, in points per unit length.
pub const DEFAULT_SAMPLE_DENSITY: f64 = 0.1;

/// Whole scenario: shared settings, worlds and run length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks to simulate.
    pub ticks: u64,
    /// Surface sampling density used when logging geometry changes.
    pub density: f64,
    /// Settings applied to every world's border.
    pub settings: BorderSettings,
    /// Worlds to simulate, one border each.
    pub worlds: Vec<WorldConfig>,
}

impl Default for EngineConfig {
    /// Two worlds shrinking over ten seconds towards different sizes.
    fn default() -> Self {
        Self {
            ticks: 220,
            density: DEFAULT_SAMPLE_DENSITY,
            settings: BorderSettings::default(),
            worlds: vec![
                WorldConfig {
                    id: 0,
                    name: "overworld".into(),
                    target_size: Some(50.0),
                    duration_ms: 10_000,
                    occupants: vec![[60.0, 64.0, 0.0], [0.0, 64.0, 0.0]],
                    ..WorldConfig::default()
                },
                WorldConfig {
                    id: 1,
                    name: "nether".into(),
                    target_size: Some(60.0),
                    duration_ms: 10_000,
                    ..WorldConfig::default()
                },
            ],
        }
    }
}

impl EngineConfig {
    /// Reads a JSON scenario from `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid scenario.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let text = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: file.to_path_buf(),
            source,
        })
    }

    /// Occupants of every configured world, keyed for
    /// [`OccupantProvider`](crate::border::OccupantProvider) lookups.
    #[must_use]
    pub fn occupants(&self) -> HashMap<WorldId, Vec<Occupant>> {
        let mut next_id = 0_u64;
        self.worlds
            .iter()
            .map(|world| {
                let occupants = world
                    .occupants
                    .iter()
                    .map(|&position| {
                        next_id += 1;
                        Occupant::new(next_id, DVec3::from_array(position))
                    })
                    .collect();
                (WorldId(world.id), occupants)
            })
            .collect()
    }
}

/// One world's border and its scripted transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World identifier.
    pub id: u64,
    /// Name reported in tracker events.
    pub name: String,
    /// Starting edge length.
    pub size: f64,
    /// Starting center.
    pub center: [f64; 3],
    /// Cube or column.
    pub vertical: VerticalExtent,
    /// Size to lerp towards, if any.
    pub target_size: Option<f64>,
    /// Center to lerp towards, if any.
    pub target_center: Option<[f64; 3]>,
    /// Duration of the scripted transition in wall-clock milliseconds.
    pub duration_ms: i64,
    /// Fixed occupant positions inside this world.
    pub occupants: Vec<[f64; 3]>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            id: 0,
            name: "world".into(),
            size: 100.0,
            center: [0.0; 3],
            vertical: VerticalExtent::default(),
            target_size: None,
            target_center: None,
            duration_ms: 0,
            occupants: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Handle to register this world's border under.
    #[must_use]
    pub fn handle(&self) -> WorldHandle {
        WorldHandle::new(self.id, self.name.clone())
    }

    /// Builds the border with its scripted transitions already running.
    ///
    /// # Errors
    /// Propagates [`BorderError`] for non-finite geometry or a negative
    /// duration.
    pub fn build(&self, settings: BorderSettings) -> Result<RegionBorder, BorderError> {
        let shape = BoxBoundary::new(crate::DEFAULT_BORDER_SIZE, DVec3::ZERO, self.vertical);
        let mut border = RegionBorder::with_settings(self.id, shape, settings);
        border.set_size_instant(self.size)?;
        border.set_center_instant(DVec3::from_array(self.center))?;
        if let Some(target) = self.target_size {
            border.lerp_size_between(border.size(), target, self.duration_ms)?;
        }
        if let Some(target) = self.target_center {
            border.lerp_center_between(
                border.center(),
                DVec3::from_array(target),
                self.duration_ms,
            )?;
        }
        Ok(border)
    }
}
