mod arc_length;
mod bezier;
mod checkpoint;
mod error;
mod path;
mod query;
mod segment;
mod settings;

pub use arc_length::*;
pub use bezier::*;
pub use checkpoint::*;
pub use error::*;
pub use path::*;
pub use query::*;
pub use segment::*;
pub use settings::*;
// Named explicitly so they win over `bevy::math::CubicBezier` in glob imports.
pub use segment::{CubicBezier, QuadraticBezier};

use bevy::prelude::{App, Plugin};

/// Plugin that registers path types for reflection and installs the
/// shared [`SamplingSettings`] resource.
pub struct SplinePlugin;

impl Plugin for SplinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SamplingSettings>()
            .register_type::<SamplingSettings>()
            .register_type::<BezierPath>()
            .register_type::<PathCheckpoint>();
    }
}
