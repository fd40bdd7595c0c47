//! Equal-distance markers computed off the main thread.
//!
//! Add [`PathMarkers`] next to a [`BezierPath`](crate::spline::BezierPath) and
//! [`MarkerPoints`] is filled in once the background job finishes. Editing
//! the path while a job is running cancels it; only the newest request ever
//! publishes points.
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_bezier_path::prelude::*;
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn((BezierPath::new(), PathMarkers::with_spacing(0.25)));
//! }
//!
//! fn report(markers: Query<&MarkerPoints, Changed<MarkerPoints>>) {
//!     for markers in &markers {
//!         info!("{} markers", markers.points.len());
//!     }
//! }
//! ```

mod components;
mod job;
mod systems;

pub use components::*;
pub use job::*;
pub use systems::{collect_marker_results, request_marker_updates};

use bevy::prelude::*;

use crate::spline::SplinePlugin;

/// Plugin that keeps [`MarkerPoints`] up to date.
pub struct SplineMarkersPlugin;

impl Plugin for SplineMarkersPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<SplinePlugin>() {
            app.add_plugins(SplinePlugin);
        }

        app.register_type::<PathMarkers>()
            .register_type::<MarkerPoints>()
            .add_systems(
                Update,
                (
                    systems::request_marker_updates,
                    systems::collect_marker_results,
                )
                    .chain(),
            );
    }
}
