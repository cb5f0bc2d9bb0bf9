#![cfg_attr(docsrs, feature(doc_cfg))]
//! Animated world borders and a completion barrier across several worlds.
//!
//! Each world owns a [`RegionBorder`] whose size and center move linearly in
//! simulation ticks. A [`MultiRegionTracker`] watches a set of borders and
//! reports when every one of them has settled. Geometry queries (containment,
//! distance, surface sampling) go through the [`BoundaryShape`] trait.
pub mod animated;
pub mod border;
pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod numeric;
pub mod shape;
pub mod tracker;
pub mod world_handle;
pub use constants::*;

// Re-export commonly used items
pub use animated::{AnimatedValue, Lerp, MotionStatus};
pub use border::{BorderChange, BorderSettings, BorderSnapshot, ChangeListener, RegionBorder};
pub use driver::Simulation;
pub use error::{BorderError, ConfigError, TrackerError};
pub use geometry::{Aabb, Containment, PointKey};
pub use logging::init as init_logging;
pub use shape::{BoundaryShape, BoxBoundary, VerticalExtent};
pub use tracker::{MultiRegionTracker, TrackerEvent, TrackerListener};
pub use world_handle::{WorldHandle, WorldId};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust
    //! use lisiere::prelude::*;
    //!
    //! let mut border = RegionBorder::new(
    //!     WorldId(0),
    //!     BoxBoundary::new(100.0, DVec3::ZERO, VerticalExtent::Unbounded),
    //! );
    //! border.lerp_size_between(100.0, 50.0, 1_000).unwrap();
    //! let mut tracker = MultiRegionTracker::new();
    //! tracker.add_region(&mut border, WorldHandle::new(WorldId(0), "overworld")).unwrap();
    //! assert_eq!(border.status(), MotionStatus::Shrinking);
    //! ```

    pub use crate::border::{DamageSink, Occupant, OccupantProvider, RegionBorder};
    pub use crate::shape::{BoundaryShape, BoxBoundary, VerticalExtent};
    pub use crate::tracker::{MultiRegionTracker, TrackerEvent};
    pub use crate::MotionStatus;
    pub use crate::{WorldHandle, WorldId};
    pub use glam::DVec3;
}
