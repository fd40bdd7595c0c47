use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::spline::{BezierPath, CubicBezier, SplineError};

/// Shared flag a running job polls to find out it has been superseded.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Marker positions produced by one completed job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerBatch {
    /// Generation of the request that produced these points.
    pub generation: u64,
    pub points: Vec<Vec3>,
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed { generation: u64, count: usize },
    Cancelled { generation: u64 },
    Failed { generation: u64, error: SplineError },
}

/// A snapshot of the path's segments plus everything the worker needs.
///
/// The segments are copied out so the job never touches the live component.
pub struct MarkerJob {
    generation: u64,
    spacing: f32,
    segments: Vec<CubicBezier>,
    token: CancellationToken,
    buffer: Arc<Mutex<MarkerBatch>>,
    latest: Arc<AtomicU64>,
}

impl MarkerJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sample every segment, checking for cancellation before each one.
    ///
    /// Results are published only while this job is still the latest request.
    pub fn run(self) -> JobOutcome {
        let generation = self.generation;
        let mut points = Vec::new();

        for segment in &self.segments {
            if self.is_stale() {
                return JobOutcome::Cancelled { generation };
            }
            match segment.equal_distance_points(self.spacing) {
                Ok(segment_points) => points.extend(segment_points),
                Err(error) => return JobOutcome::Failed { generation, error },
            }
        }

        let Ok(mut buffer) = self.buffer.lock() else {
            return JobOutcome::Failed {
                generation,
                error: SplineError::invalid("marker buffer poisoned"),
            };
        };
        if self.is_stale() || buffer.generation > generation {
            return JobOutcome::Cancelled { generation };
        }
        let count = points.len();
        *buffer = MarkerBatch { generation, points };
        JobOutcome::Completed { generation, count }
    }

    fn is_stale(&self) -> bool {
        self.token.is_cancelled() || self.latest.load(Ordering::Acquire) != self.generation
    }
}

/// Issues marker jobs for one path. A new request cancels the one in flight.
#[derive(Debug, Default)]
pub struct MarkerSampler {
    latest: Arc<AtomicU64>,
    current: Option<CancellationToken>,
    buffer: Arc<Mutex<MarkerBatch>>,
    collected: u64,
}

impl MarkerSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a job for the current state of `path`, sampling each segment
    /// at `res_per_meter`.
    ///
    /// Fails without cancelling anything if `spacing` is not a positive
    /// number or the density is zero.
    pub fn request(
        &mut self,
        path: &BezierPath,
        spacing: f32,
        res_per_meter: usize,
    ) -> Result<MarkerJob, SplineError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(SplineError::invalid(format!(
                "marker spacing must be positive, got {spacing}"
            )));
        }
        if res_per_meter == 0 {
            return Err(SplineError::invalid("res_per_meter must be greater than zero"));
        }

        if let Some(previous) = self.current.take() {
            previous.cancel();
        }

        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());

        Ok(MarkerJob {
            generation,
            spacing,
            segments: path
                .segments()
                .map(|segment| segment.with_density(res_per_meter))
                .collect(),
            token,
            buffer: Arc::clone(&self.buffer),
            latest: Arc::clone(&self.latest),
        })
    }

    /// Cancel the request in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// Generation of the most recent request.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Take the newest published batch if it has not been taken before.
    pub fn take_latest(&mut self) -> Option<MarkerBatch> {
        let buffer = self.buffer.lock().ok()?;
        if buffer.generation <= self.collected {
            return None;
        }
        self.collected = buffer.generation;
        Some(buffer.clone())
    }
}
