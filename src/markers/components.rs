use bevy::prelude::*;
use bevy::tasks::Task;

use super::{JobOutcome, MarkerSampler};

/// Requests equal-distance markers along the [`BezierPath`](crate::spline::BezierPath)
/// on the same entity.
///
/// Markers are recomputed in the background whenever the path or this
/// component changes.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
#[require(MarkerPoints, MarkerTask)]
pub struct PathMarkers {
    /// Distance between markers. Falls back to
    /// [`SamplingSettings::segment_length`](crate::spline::SamplingSettings) when `None`.
    pub spacing: Option<f32>,
    /// Whether markers are recomputed.
    pub enabled: bool,
}

impl Default for PathMarkers {
    fn default() -> Self {
        Self {
            spacing: None,
            enabled: true,
        }
    }
}

impl PathMarkers {
    pub fn with_spacing(spacing: f32) -> Self {
        Self {
            spacing: Some(spacing),
            ..default()
        }
    }
}

/// Latest marker positions, in the path's local space.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component, Default)]
pub struct MarkerPoints {
    pub points: Vec<Vec3>,
    /// Generation of the request that produced `points`. Zero until the
    /// first batch arrives.
    pub generation: u64,
}

/// Background job state for one path.
#[derive(Component, Default)]
pub struct MarkerTask {
    pub(crate) sampler: MarkerSampler,
    pub(crate) task: Option<Task<JobOutcome>>,
}

impl MarkerTask {
    /// Whether a job is still running.
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}
