use bevy::prelude::*;

use super::arc_length::DEFAULT_RESOLUTION;
use super::segment::DEFAULT_RES_PER_METER;
use super::{SplineError, SplineResult};

/// Numeric sampling options shared by the path systems.
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource, Default)]
pub struct SamplingSettings {
    /// Fixed sampling density for explicit-resolution queries.
    pub resolution: usize,
    /// Distance between equal-distance markers.
    pub segment_length: f32,
    /// Samples per metre for adaptive-resolution queries.
    pub res_per_meter: usize,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            segment_length: 0.5,
            res_per_meter: DEFAULT_RES_PER_METER,
        }
    }
}

impl SamplingSettings {
    /// Check that every option is strictly positive.
    pub fn validate(&self) -> SplineResult<()> {
        if self.resolution == 0 {
            return Err(SplineError::invalid("resolution must be greater than zero"));
        }
        if self.res_per_meter == 0 {
            return Err(SplineError::invalid("res_per_meter must be greater than zero"));
        }
        if !self.segment_length.is_finite() || self.segment_length <= 0.0 {
            return Err(SplineError::invalid(format!(
                "segment length must be positive, got {}",
                self.segment_length
            )));
        }
        Ok(())
    }
}
