//! # bevy_bezier_path
//!
//! Editable cubic Bézier paths for Bevy.
//!
//! ## Features
//!
//! - Pure quadratic and cubic Bézier evaluation with arc-length sampling
//! - Editable multi-segment paths with smooth control mirroring, open/closed
//!   toggling and per-anchor rotations
//! - Checkpoints that snapshot and restore a path
//! - World-space queries through any host transform
//! - Entities that follow a path at constant speed
//! - Equal-distance markers computed on a background task pool
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_bezier_path::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins((SplinePlugin, SplineFollowPlugin, SplineMarkersPlugin))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     let mut path = BezierPath::new();
//!     path.add_segment(Vec3::new(3.0, 1.0, 0.0), Quat::IDENTITY);
//!     path.toggle_closed();
//!
//!     let path = commands
//!         .spawn((path, Transform::default(), PathMarkers::default()))
//!         .id();
//!
//!     commands.spawn((
//!         Transform::default(),
//!         PathFollower::new(path).with_loop_mode(LoopMode::Loop),
//!     ));
//! }
//! ```
//!
//! ## Plugins
//!
//! - [`SplinePlugin`]: Type registration and [`SamplingSettings`](spline::SamplingSettings) (required)
//! - [`SplineFollowPlugin`]: Animate entities along paths (optional)
//! - [`SplineMarkersPlugin`]: Background equal-distance markers (optional)

pub mod markers;
pub mod path_follow;
pub mod spline;

pub use markers::SplineMarkersPlugin;
pub use path_follow::SplineFollowPlugin;
pub use spline::SplinePlugin;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::markers::{MarkerPoints, PathMarkers, SplineMarkersPlugin};
    pub use crate::path_follow::{
        FollowerEvent, FollowerEventKind, FollowerOrientation, FollowerState, LoopMode,
        PathFollower, ProgressTarget, SplineFollowPlugin,
    };
    pub use crate::spline::{
        BezierEvaluator, BezierPath, CubicBezier, PathCheckpoint, QuadraticBezier,
        SamplingSettings, SplineError, SplinePlugin, SplineQuery, SplineResult, SplineTransform,
    };
}
