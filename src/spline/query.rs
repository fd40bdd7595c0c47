//! World-space queries over a [`BezierPath`].
//!
//! The path stores local-space points. A [`SplineQuery`] pairs it with a host
//! transform and answers position, orientation and length questions in world
//! space, using the path progress coordinate: the integer part selects the
//! segment and the fractional part is the local `t`.

use bevy::prelude::*;

use super::{BezierPath, CubicBezier, SplineResult, DEFAULT_RES_PER_METER};

/// Local to world mapping supplied by whatever owns the path.
pub trait SplineTransform {
    /// The full local to world matrix.
    fn world_matrix(&self) -> Mat4;

    /// Map a local-space point to world space.
    fn to_world_point(&self, point: Vec3) -> Vec3 {
        self.world_matrix().transform_point3(point)
    }

    /// Map a local-space orientation to world space.
    fn to_world_rotation(&self, rotation: Quat) -> Quat {
        let (_, world, _) = self.world_matrix().to_scale_rotation_translation();
        world * rotation
    }
}

impl SplineTransform for Mat4 {
    fn world_matrix(&self) -> Mat4 {
        *self
    }
}

impl SplineTransform for Transform {
    fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    fn to_world_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    fn to_world_rotation(&self, rotation: Quat) -> Quat {
        self.rotation * rotation
    }
}

impl SplineTransform for GlobalTransform {
    fn world_matrix(&self) -> Mat4 {
        Mat4::from(self.affine())
    }

    fn to_world_rotation(&self, rotation: Quat) -> Quat {
        self.rotation() * rotation
    }
}

/// Read-only world-space view of a path.
pub struct SplineQuery<'a, T: SplineTransform> {
    path: &'a BezierPath,
    transform: T,
    res_per_meter: usize,
}

impl<'a, T: SplineTransform> SplineQuery<'a, T> {
    pub fn new(path: &'a BezierPath, transform: T) -> Self {
        Self {
            path,
            transform,
            res_per_meter: DEFAULT_RES_PER_METER,
        }
    }

    /// Sample world-space segments at `res_per_meter` for length and
    /// distance queries.
    pub fn with_density(mut self, res_per_meter: usize) -> Self {
        self.res_per_meter = res_per_meter.max(1);
        self
    }

    pub fn path(&self) -> &BezierPath {
        self.path
    }

    /// Largest valid progress value.
    pub fn max_progress(&self) -> f32 {
        self.path.num_segments() as f32
    }

    /// World-space position at `progress`, clamped to `[0, num_segments]`.
    pub fn position_at(&self, progress: f32) -> Vec3 {
        self.transform.to_world_point(self.path.position_at(progress))
    }

    /// World-space orientation at `progress`.
    pub fn orientation_at(&self, progress: f32) -> Quat {
        self.transform
            .to_world_rotation(self.path.orientation_at(progress))
    }

    /// World-space tangent at `progress` (not normalized).
    pub fn tangent_at(&self, progress: f32) -> Vec3 {
        self.transform
            .world_matrix()
            .transform_vector3(self.path.tangent_at(progress))
    }

    /// World-space segment `index`, sampled at this query's density.
    pub fn world_segment(&self, index: usize) -> SplineResult<CubicBezier> {
        let matrix = self.transform.world_matrix();
        self.path
            .segment(index)
            .map(|segment| self.to_world_segment(segment, &matrix))
    }

    fn to_world_segment(&self, segment: CubicBezier, matrix: &Mat4) -> CubicBezier {
        segment.transform(matrix).with_density(self.res_per_meter)
    }

    /// Total world-space arc length using adaptive resolution.
    pub fn length(&self) -> f32 {
        let matrix = self.transform.world_matrix();
        self.path
            .segments()
            .map(|segment| self.to_world_segment(segment, &matrix).length())
            .sum()
    }

    /// Total world-space arc length with `resolution` samples per segment.
    pub fn length_at_resolution(&self, resolution: usize) -> f32 {
        let matrix = self.transform.world_matrix();
        self.path
            .segments()
            .map(|segment| segment.transform(&matrix).length_at_resolution(resolution))
            .sum()
    }

    /// Progress reached by travelling `distance` world units from `start`.
    ///
    /// Negative distances travel backwards. Open paths stop at their ends;
    /// closed paths wrap around.
    pub fn progress_at_distance(&self, start: f32, distance: f32) -> SplineResult<f32> {
        let mut distance = distance;
        if self.path.is_closed() {
            let total = self.length();
            if total <= 0.0 {
                let (index, t) = self.path.locate(start);
                return Ok(index as f32 + t);
            }
            distance %= total;
        }
        self.walk(start, distance, self.path.is_closed())
            .map(|(progress, _)| progress)
    }

    /// Travel `distance` world units from `start` without wrapping.
    ///
    /// Returns the progress reached and the signed distance left over when
    /// the walk ran into an end of the path (zero otherwise).
    pub fn advance(&self, start: f32, distance: f32) -> SplineResult<(f32, f32)> {
        self.walk(start, distance, false)
    }

    fn walk(&self, start: f32, distance: f32, wrap: bool) -> SplineResult<(f32, f32)> {
        let segments = self.path.num_segments();
        let matrix = self.transform.world_matrix();
        let (mut index, mut t) = self.path.locate(start);
        let mut remaining = distance;

        while remaining != 0.0 {
            let segment = self.to_world_segment(self.path.segment(index)?, &matrix);
            let (new_t, travelled) = segment.walk(t, remaining)?;

            if travelled >= remaining.abs() {
                t = new_t;
                break;
            }
            remaining -= travelled.copysign(remaining);

            if remaining > 0.0 {
                if index + 1 < segments {
                    index += 1;
                } else if wrap {
                    index = 0;
                } else {
                    return Ok((segments as f32, remaining));
                }
                t = 0.0;
            } else {
                if index > 0 {
                    index -= 1;
                } else if wrap {
                    index = segments - 1;
                } else {
                    return Ok((0.0, remaining));
                }
                t = 1.0;
            }
        }

        Ok((index as f32 + t, 0.0))
    }
}
