//! Per-world border owning one [`BoundaryShape`].
//!
//! [`RegionBorder`] exposes size/center setters and lerps measured in
//! wall-clock milliseconds, notifies [`ChangeListener`]s synchronously,
//! re-announces in-flight transitions once per nominal second, signals damage
//! for occupants beyond the safe zone, and reports stationary/moving flips to
//! the [`MultiRegionTracker`](crate::tracker::MultiRegionTracker) it is linked
//! to.

mod damage;
mod listener;
mod settings;
mod snapshot;

pub use damage::{
    damage_amount, DamageCause, DamageReport, DamageSink, Occupant, OccupantId, OccupantProvider,
};
pub use listener::{AnnounceReason, BorderChange, ChangeListener, LerpAnnouncement};
pub use settings::BorderSettings;
pub use snapshot::{BorderSnapshot, PendingTransition};

#[cfg(test)]
pub use damage::{MockDamageSink, MockOccupantProvider};
#[cfg(test)]
pub use listener::MockChangeListener;

use glam::DVec3;
use log::{debug, trace};

use crate::animated::{AnimatedValue, Lerp, MotionStatus};
use crate::error::BorderError;
use crate::numeric::{millis_to_ticks, nominal_rate, ticks_to_millis_at, ticks_to_nominal_millis};
use crate::shape::{BoundaryShape, BoxBoundary};
use crate::tracker::{MotionChange, MotionFlag, TrackerLink, TransitionReport};
use crate::world_handle::WorldId;
use crate::{MAX_BORDER_SIZE, MAX_CENTER_COORDINATE, MIN_BORDER_SIZE, REANNOUNCE_INTERVAL_TICKS};

/// Border of one world.
///
/// All mutation happens on the simulation thread. The border holds `Rc`s, so
/// it is neither `Send` nor `Sync`.
pub struct RegionBorder<S = BoxBoundary> {
    world: WorldId,
    shape: S,
    settings: BorderSettings,
    listeners: Vec<Box<dyn ChangeListener>>,
    motion: MotionFlag,
    link: Option<TrackerLink>,
    size_ticks_since_announce: u64,
    center_ticks_since_announce: u64,
    observed_tick_rate: Option<f64>,
    size_duration_millis: u64,
    center_duration_millis: u64,
}

impl<S: BoundaryShape> RegionBorder<S> {
    /// Wraps `shape` as the border of `world` with default settings.
    pub fn new(world: impl Into<WorldId>, shape: S) -> Self {
        Self::with_settings(world, shape, BorderSettings::default())
    }

    /// Wraps `shape` as the border of `world` with explicit settings.
    pub fn with_settings(world: impl Into<WorldId>, shape: S, settings: BorderSettings) -> Self {
        let motion = MotionFlag::default();
        motion.set(shape.is_moving());
        Self {
            world: world.into(),
            shape,
            settings,
            listeners: Vec::new(),
            motion,
            link: None,
            size_ticks_since_announce: 0,
            center_ticks_since_announce: 0,
            observed_tick_rate: None,
            size_duration_millis: 0,
            center_duration_millis: 0,
        }
    }

    /// World this border belongs to.
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// Geometry backing the border.
    #[must_use]
    pub const fn shape(&self) -> &S {
        &self.shape
    }

    /// Damage and warning settings currently in force.
    #[must_use]
    pub const fn settings(&self) -> &BorderSettings {
        &self.settings
    }

    /// Current edge length.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.shape.size()
    }

    /// Current center.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        self.shape.center()
    }

    /// Stationary, growing or shrinking, derived from the size animation.
    #[must_use]
    pub fn status(&self) -> MotionStatus {
        self.shape.status()
    }

    /// Returns `true` while size or center is mid-transition.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.shape.is_moving()
    }

    /// Returns `true` while linked to a tracker that still exists.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.link.as_ref().is_some_and(TrackerLink::is_alive)
    }

    /// Registers a listener notified of every change from now on.
    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// Tick rate measured by the driver, used only to convert remaining ticks
    /// into wall-clock time for listeners. Stored durations never change.
    pub fn set_observed_tick_rate(&mut self, ticks_per_second: f64) {
        self.observed_tick_rate =
            (ticks_per_second.is_finite() && ticks_per_second > 0.0).then_some(ticks_per_second);
    }

    /// Sets the size immediately, cancelling any size transition.
    ///
    /// # Errors
    /// Returns [`BorderError::NonFinite`] if `size` is NaN or infinite.
    pub fn set_size_instant(&mut self, size: f64) -> Result<(), BorderError> {
        let target = clamp_size(size)?;
        let start = self.shape.size();
        self.begin_size(start, target, 0, 0);
        Ok(())
    }

    /// Moves the size from `start` to `end` over `millis` of wall-clock time,
    /// converted to ticks at the nominal rate.
    ///
    /// # Errors
    /// Returns [`BorderError::InvalidDuration`] for a negative duration and
    /// [`BorderError::NonFinite`] for a NaN or infinite size. The border is
    /// left untouched on error.
    pub fn lerp_size_between(&mut self, start: f64, end: f64, millis: i64) -> Result<(), BorderError> {
        let duration = checked_millis(millis)?;
        let from = clamp_size(start)?;
        let to = clamp_size(end)?;
        self.begin_size(from, to, millis_to_ticks(duration), duration);
        Ok(())
    }

    /// Sets the center immediately, cancelling any center transition.
    ///
    /// # Errors
    /// Returns [`BorderError::NonFinite`] if a component is NaN or infinite.
    pub fn set_center_instant(&mut self, center: DVec3) -> Result<(), BorderError> {
        let target = clamp_center(center)?;
        let start = self.shape.center();
        self.begin_center(start, target, 0, 0);
        Ok(())
    }

    /// Moves the center from `start` to `end` over `millis` of wall-clock
    /// time. The size animation is unaffected.
    ///
    /// # Errors
    /// Same conditions as [`RegionBorder::lerp_size_between`].
    pub fn lerp_center_between(
        &mut self,
        start: DVec3,
        end: DVec3,
        millis: i64,
    ) -> Result<(), BorderError> {
        let duration = checked_millis(millis)?;
        let from = clamp_center(start)?;
        let to = clamp_center(end)?;
        self.begin_center(from, to, millis_to_ticks(duration), duration);
        Ok(())
    }

    /// Sets the damage dealt per block beyond the safe zone. Negative values
    /// are raised to zero.
    ///
    /// # Errors
    /// Returns [`BorderError::NonFinite`] for a NaN or infinite rate.
    pub fn set_damage_per_block(&mut self, damage: f64) -> Result<(), BorderError> {
        let rate = non_negative(damage, "damage per block")?;
        self.settings.damage_per_block = rate;
        self.notify(&BorderChange::DamagePerBlock(rate));
        Ok(())
    }

    /// Sets how far past the border occupants may stand unharmed.
    ///
    /// # Errors
    /// Returns [`BorderError::NonFinite`] for a NaN or infinite distance.
    pub fn set_safe_zone(&mut self, distance: f64) -> Result<(), BorderError> {
        let zone = non_negative(distance, "safe zone")?;
        self.settings.safe_zone = zone;
        self.notify(&BorderChange::SafeZone(zone));
        Ok(())
    }

    /// # Errors
    /// Returns [`BorderError::NonFinite`] for a NaN or infinite distance.
    pub fn set_warning_distance(&mut self, distance: f64) -> Result<(), BorderError> {
        let warning = non_negative(distance, "warning distance")?;
        self.settings.warning_distance = warning;
        self.notify(&BorderChange::WarningDistance(warning));
        Ok(())
    }

    /// Sets the warning lead time, in seconds, for a shrinking border.
    pub fn set_warning_time(&mut self, secs: u32) {
        self.settings.warning_time_secs = secs;
        self.notify(&BorderChange::WarningTime(secs));
    }

    /// Advances the border by one tick.
    ///
    /// The shape is advanced first and any stationary/moving flip is reported
    /// to the tracker. In-flight transitions are then re-announced on the
    /// fixed cadence, and finally every occupant standing further than the
    /// safe zone outside the border is reported to `sink`.
    pub fn tick(
        &mut self,
        occupants: &dyn OccupantProvider,
        sink: &mut dyn DamageSink,
    ) -> Option<MotionChange> {
        self.shape.tick();
        let change = self.sync_motion();

        let size_moving = self.shape.size_animation().is_moving();
        if announce_due(&mut self.size_ticks_since_announce, size_moving) {
            self.reannounce_size();
        }
        let center_moving = self.shape.center_animation().is_moving();
        if announce_due(&mut self.center_ticks_since_announce, center_moving) {
            self.reannounce_center();
        }

        for occupant in occupants.occupants(self.world) {
            if let Some((amount, distance)) = self.damage_at(occupant.position) {
                sink.apply_damage(
                    occupant.id,
                    amount,
                    DamageCause::OutsideBorder {
                        world: self.world,
                        distance,
                    },
                );
            }
        }
        change
    }

    /// Damage owed by an occupant at `position`, with its distance past the
    /// border. `None` inside the border or within the safe zone.
    #[must_use]
    pub fn damage_at(&self, position: DVec3) -> Option<(u32, f64)> {
        if self.shape.contains_point(position) {
            return None;
        }
        let distance = self.shape.distance_to(position);
        let excess = distance - self.settings.safe_zone;
        (excess > 0.0).then(|| (damage_amount(excess, self.settings.damage_per_block), distance))
    }

    /// Distance from the border within which occupants are warned: the
    /// configured warning distance, or the ground a shrinking border covers
    /// in the warning time if that is larger.
    #[must_use]
    pub fn warning_threshold(&self) -> f64 {
        let by_time = self.shrink_speed() * f64::from(self.settings.warning_time_secs);
        self.settings.warning_distance.max(by_time)
    }

    /// Returns `true` outside the border, or inside within
    /// [`RegionBorder::warning_threshold`] of it.
    #[must_use]
    pub fn is_in_warning_zone(&self, point: DVec3) -> bool {
        !self.shape.contains_point(point)
            || self.shape.distance_to(point) < self.warning_threshold()
    }

    /// Captures the state needed to resume after a restart.
    #[must_use]
    pub fn snapshot(&self) -> BorderSnapshot {
        let size = self.shape.size_animation();
        let center = self.shape.center_animation();
        BorderSnapshot {
            size: size.value(),
            center: center.value().to_array(),
            size_transition: pending(size),
            center_transition: pending(center).map(|p| PendingTransition {
                target: p.target.to_array(),
                remaining_ticks: p.remaining_ticks,
            }),
            settings: self.settings,
        }
    }

    /// Rebuilds a border of `world` from a snapshot, using `shape` for the
    /// geometry kind.
    ///
    /// # Errors
    /// See [`RegionBorder::restore`].
    pub fn from_snapshot(
        world: impl Into<WorldId>,
        shape: S,
        snapshot: &BorderSnapshot,
    ) -> Result<Self, BorderError> {
        let mut border = Self::new(world, shape);
        border.restore(snapshot)?;
        Ok(border)
    }

    /// Replaces state with `snapshot`, announcing it as a fresh mutation.
    ///
    /// # Errors
    /// Returns [`BorderError::NonFinite`] if the snapshot holds NaN or
    /// infinite values. Nothing is applied on error.
    pub fn restore(&mut self, snapshot: &BorderSnapshot) -> Result<(), BorderError> {
        let size_now = clamp_size(snapshot.size)?;
        let center_now = clamp_center(DVec3::from_array(snapshot.center))?;
        let size_target = snapshot
            .size_transition
            .map(|p| clamp_size(p.target).map(|t| (t, p.remaining_ticks)))
            .transpose()?
            .unwrap_or((size_now, 0));
        let center_target = snapshot
            .center_transition
            .map(|p| clamp_center(DVec3::from_array(p.target)).map(|t| (t, p.remaining_ticks)))
            .transpose()?
            .unwrap_or((center_now, 0));
        for (name, value) in [
            ("damage per block", snapshot.settings.damage_per_block),
            ("safe zone", snapshot.settings.safe_zone),
            ("warning distance", snapshot.settings.warning_distance),
        ] {
            non_negative(value, name)?;
        }

        self.settings = snapshot.settings;
        let (size_end, size_ticks) = size_target;
        self.begin_size(size_now, size_end, size_ticks, ticks_to_nominal_millis(size_ticks));
        let (center_end, center_ticks) = center_target;
        self.begin_center(
            center_now,
            center_end,
            center_ticks,
            ticks_to_nominal_millis(center_ticks),
        );
        Ok(())
    }

    pub(crate) fn attach(&mut self, link: TrackerLink) -> MotionFlag {
        self.motion.set(self.shape.is_moving());
        self.link = Some(link);
        self.motion.clone()
    }

    pub(crate) fn detach(&mut self) -> Option<TrackerLink> {
        self.link.take()
    }

    pub(crate) const fn link(&self) -> Option<&TrackerLink> {
        self.link.as_ref()
    }

    fn begin_size(&mut self, start: f64, end: f64, ticks: u64, millis: u64) {
        self.shape.replace_size(AnimatedValue::between(start, end, ticks));
        self.size_duration_millis = millis;
        self.size_ticks_since_announce = 0;
        let announcement = self.announcement(start, end, ticks, millis, AnnounceReason::Started);
        self.notify(&BorderChange::Size(announcement));
        self.sync_motion();
    }

    fn begin_center(&mut self, start: DVec3, end: DVec3, ticks: u64, millis: u64) {
        self.shape
            .replace_center(AnimatedValue::between(start, end, ticks));
        self.center_duration_millis = millis;
        self.center_ticks_since_announce = 0;
        let announcement = self.announcement(start, end, ticks, millis, AnnounceReason::Started);
        self.notify(&BorderChange::Center(announcement));
        self.sync_motion();
    }

    fn announcement<T>(
        &self,
        start: T,
        end: T,
        remaining_ticks: u64,
        nominal_millis: u64,
        reason: AnnounceReason,
    ) -> LerpAnnouncement<T> {
        let rate = self.observed_tick_rate.unwrap_or_else(nominal_rate);
        LerpAnnouncement {
            start,
            end,
            remaining_ticks,
            remaining_millis: ticks_to_millis_at(remaining_ticks, rate),
            nominal_millis,
            reason,
        }
    }

    fn reannounce_size(&mut self) {
        let size = *self.shape.size_animation();
        if let Some(t) = size.transition() {
            let announcement = self.announcement(
                t.current(),
                t.end(),
                t.remaining_ticks(),
                self.size_duration_millis,
                AnnounceReason::Refresh,
            );
            self.notify(&BorderChange::Size(announcement));
            trace!("world {} re-announced size transition", self.world);
        }
    }

    fn reannounce_center(&mut self) {
        let center = *self.shape.center_animation();
        if let Some(t) = center.transition() {
            let announcement = self.announcement(
                t.current(),
                t.end(),
                t.remaining_ticks(),
                self.center_duration_millis,
                AnnounceReason::Refresh,
            );
            self.notify(&BorderChange::Center(announcement));
            trace!("world {} re-announced center transition", self.world);
        }
    }

    fn notify(&mut self, change: &BorderChange) {
        for listener in &mut self.listeners {
            listener.on_change(self.world, change);
        }
    }

    /// Publishes a stationary/moving flip to the motion flag and the tracker.
    fn sync_motion(&mut self) -> Option<MotionChange> {
        let moving = self.shape.is_moving();
        if self.motion.is_moving() == moving {
            return None;
        }
        self.motion.set(moving);
        let change = if moving {
            MotionChange::BecameActive
        } else {
            MotionChange::BecameStationary
        };
        debug!("world {} border {:?}", self.world, change);
        if let Some(link) = &self.link {
            let report = TransitionReport {
                world: self.world,
                change,
            };
            if !link.report(report) {
                debug!("world {} tracker dropped; report discarded", self.world);
            }
        }
        Some(change)
    }

    /// Edge speed of a shrinking border, in units per nominal second.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Tick counts stay far below 2^52 for any realistic transition."
    )]
    fn shrink_speed(&self) -> f64 {
        let size = self.shape.size_animation();
        match (size.status(), size.transition()) {
            (MotionStatus::Shrinking, Some(t)) => {
                let per_tick = (t.start() - t.end()) * 0.5 / t.total_ticks() as f64;
                per_tick * nominal_rate()
            }
            _ => 0.0,
        }
    }
}

fn pending<T: Lerp>(animation: &AnimatedValue<T>) -> Option<PendingTransition<T>> {
    animation.transition().map(|t| PendingTransition {
        target: t.end(),
        remaining_ticks: t.remaining_ticks(),
    })
}

/// Advances one animation's re-announce cadence. Returns `true` on the tick
/// its refresh is due.
const fn announce_due(ticks_since_announce: &mut u64, moving: bool) -> bool {
    if !moving {
        *ticks_since_announce = 0;
        return false;
    }
    *ticks_since_announce += 1;
    if *ticks_since_announce < REANNOUNCE_INTERVAL_TICKS {
        return false;
    }
    *ticks_since_announce = 0;
    true
}

fn checked_millis(millis: i64) -> Result<u64, BorderError> {
    u64::try_from(millis).map_err(|_| BorderError::InvalidDuration { millis })
}

fn clamp_size(size: f64) -> Result<f64, BorderError> {
    if !size.is_finite() {
        return Err(BorderError::NonFinite { what: "size" });
    }
    Ok(size.clamp(MIN_BORDER_SIZE, MAX_BORDER_SIZE))
}

fn clamp_center(center: DVec3) -> Result<DVec3, BorderError> {
    if !center.is_finite() {
        return Err(BorderError::NonFinite { what: "center" });
    }
    let limit = DVec3::splat(MAX_CENTER_COORDINATE);
    Ok(center.clamp(-limit, limit))
}

fn non_negative(value: f64, what: &'static str) -> Result<f64, BorderError> {
    if !value.is_finite() {
        return Err(BorderError::NonFinite { what });
    }
    Ok(value.max(0.0))
}

#[cfg(test)]
mod tests;
