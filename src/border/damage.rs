//! Occupant and damage boundaries consumed by [`RegionBorder::tick`].
//!
//! The border only computes and signals damage. Applying it to an occupant is
//! the sink's concern.
//!
//! [`RegionBorder::tick`]: super::RegionBorder::tick

use glam::DVec3;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::numeric::floor_to_u32;
use crate::world_handle::WorldId;

/// Identifier of an occupant (player, mob, ...) inside a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OccupantId(
    /// Raw id assigned by the host.
    pub u64,
);

/// Occupant position sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    /// Who stands there.
    pub id: OccupantId,
    /// World-space position this tick.
    pub position: DVec3,
}

impl Occupant {
    /// Occupant `id` standing at `position`.
    #[must_use]
    pub const fn new(id: u64, position: DVec3) -> Self {
        Self {
            id: OccupantId(id),
            position,
        }
    }
}

/// Why damage was signalled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageCause {
    /// The occupant stood beyond a world's border and its safe zone.
    OutsideBorder {
        /// World whose border was crossed.
        world: WorldId,
        /// Distance past the border itself, safe zone included.
        distance: f64,
    },
}

/// Damage signalled for one occupant during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    /// Occupant to damage.
    pub occupant: OccupantId,
    /// Damage points, at least one.
    pub amount: u32,
    /// Why the damage was signalled.
    pub cause: DamageCause,
}

/// Supplies the occupants of a world each tick.
#[cfg_attr(test, mockall::automock)]
pub trait OccupantProvider {
    /// Occupants currently inside `world`, wherever they stand.
    fn occupants(&self, world: WorldId) -> Vec<Occupant>;
}

/// Receives damage computed by a border. Invoked, never awaited.
#[cfg_attr(test, mockall::automock)]
pub trait DamageSink {
    /// Applies `amount` damage to `occupant`.
    fn apply_damage(&mut self, occupant: OccupantId, amount: u32, cause: DamageCause);
}

impl OccupantProvider for Vec<Occupant> {
    fn occupants(&self, _world: WorldId) -> Vec<Occupant> {
        self.clone()
    }
}

impl<S: std::hash::BuildHasher> OccupantProvider for HashMap<WorldId, Vec<Occupant>, S> {
    fn occupants(&self, world: WorldId) -> Vec<Occupant> {
        self.get(&world).cloned().unwrap_or_default()
    }
}

impl DamageSink for Vec<DamageReport> {
    fn apply_damage(&mut self, occupant: OccupantId, amount: u32, cause: DamageCause) {
        self.push(DamageReport {
            occupant,
            amount,
            cause,
        });
    }
}

/// Damage for an occupant `excess` units beyond the safe zone.
///
/// Computes `max(1, floor(excess * damage_per_block))`, saturating at
/// `u32::MAX`. Callers only invoke it for a positive `excess`.
///
/// # Examples
///
/// ```
/// use lisiere::border::damage_amount;
/// assert_eq!(damage_amount(12.0, 0.2), 2);
/// assert_eq!(damage_amount(0.5, 0.2), 1);
/// ```
#[must_use]
pub fn damage_amount(excess: f64, damage_per_block: f64) -> u32 {
    let raw = (excess * damage_per_block).max(0.0);
    floor_to_u32(raw).unwrap_or(u32::MAX).max(1)
}
