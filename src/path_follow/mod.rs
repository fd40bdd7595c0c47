//! Moves entities along a [`BezierPath`](crate::spline::BezierPath).
//!
//! Followers track a progress value in path coordinates and either move a
//! fixed number of world units per second along the arc or a fixed amount of
//! progress per second. A follower can also be sent to a given progress
//! over a fixed time with [`PathFollower::move_to_progress`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_bezier_path::prelude::*;
//!
//! fn setup(mut commands: Commands) {
//!     let path = commands.spawn(BezierPath::from_centre(Vec3::ZERO)).id();
//!
//!     commands.spawn((
//!         Transform::default(),
//!         PathFollower::new(path)
//!             .with_speed(2.0)
//!             .with_loop_mode(LoopMode::PingPong),
//!     ));
//! }
//! ```

mod components;
mod systems;

pub use components::*;
pub use systems::update_path_followers;

use bevy::prelude::*;

use crate::spline::SplinePlugin;

/// Plugin that animates [`PathFollower`] entities.
pub struct SplineFollowPlugin;

impl Plugin for SplineFollowPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<SplinePlugin>() {
            app.add_plugins(SplinePlugin);
        }

        app.register_type::<PathFollower>()
            .register_type::<LoopMode>()
            .register_type::<FollowerState>()
            .register_type::<FollowerOrientation>()
            .register_type::<ProgressTarget>()
            .add_message::<FollowerEvent>()
            .add_systems(Update, systems::update_path_followers);
    }
}
