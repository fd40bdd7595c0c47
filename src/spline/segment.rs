use bevy::prelude::*;

use super::arc_length::{
    equal_distance_parameters, estimate_length, parameter_at_distance, walk_distance,
};
use super::bezier::{
    cubic_derivative, cubic_point, fast_length_estimate, quadratic_derivative,
    quadratic_fast_length_estimate, quadratic_point, BezierEvaluator,
};
use super::{SplineError, SplineResult};

/// Default number of samples per metre of estimated curve length.
pub const DEFAULT_RES_PER_METER: usize = 100;

/// Upper bound on any adaptively chosen resolution.
pub const MAX_ADAPTIVE_RESOLUTION: usize = 200_000;

/// Resolution proportional to the estimated length, so that sampling density
/// per metre stays roughly constant.
fn adaptive_resolution(estimate: f32, res_per_meter: usize) -> usize {
    let metres = (estimate.ceil() as usize).max(1);
    metres
        .saturating_mul(res_per_meter)
        .clamp(1, MAX_ADAPTIVE_RESOLUTION)
}

/// Scale a base resolution for a distance query.
///
/// Long distances get proportionally more samples, and so do distances that
/// are a small fraction of a metre, where a coarse step would overshoot.
fn distance_resolution(base: usize, distance: f32) -> usize {
    let magnitude = distance.abs();
    let factor = if magnitude >= 1.0 {
        magnitude.ceil()
    } else {
        (1.0 / magnitude).ceil()
    };
    let factor = if factor.is_finite() { factor as usize } else { usize::MAX };
    base.saturating_mul(factor.max(1))
        .clamp(1, MAX_ADAPTIVE_RESOLUTION)
}

fn check_density(res_per_meter: usize) -> SplineResult<()> {
    if res_per_meter == 0 {
        Err(SplineError::invalid("res_per_meter must be greater than zero"))
    } else {
        Ok(())
    }
}

/// A single cubic Bézier segment with an optional start/end orientation.
///
/// Points 0 and 3 are on the curve, 1 and 2 are handles. This is a value:
/// every operation returns new data and leaves the segment untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// Control points.
    pub points: [Vec3; 4],
    /// Orientations at the start and end anchors.
    pub rotations: Option<[Quat; 2]>,
    /// Samples per metre used by length and distance queries.
    pub res_per_meter: usize,
}

impl CubicBezier {
    /// Create a segment from four control points.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self {
            points: [p0, p1, p2, p3],
            rotations: None,
            res_per_meter: DEFAULT_RES_PER_METER,
        }
    }

    /// Attach start and end orientations.
    pub fn with_rotations(mut self, start: Quat, end: Quat) -> Self {
        self.rotations = Some([start, end]);
        self
    }

    /// Set the adaptive sampling density.
    pub fn with_density(mut self, res_per_meter: usize) -> Self {
        self.res_per_meter = res_per_meter.max(1);
        self
    }

    /// Control point at `index` (0..4).
    pub fn point(&self, index: usize) -> SplineResult<Vec3> {
        SplineError::check_index(index, self.points.len())?;
        Ok(self.points[index])
    }

    /// Copy of this segment with the control point at `index` replaced.
    pub fn with_point(mut self, index: usize, position: Vec3) -> SplineResult<Self> {
        SplineError::check_index(index, self.points.len())?;
        self.points[index] = position;
        Ok(self)
    }

    /// Position at parameter `t`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let [p0, p1, p2, p3] = self.points;
        cubic_point(p0, p1, p2, p3, t)
    }

    /// Unnormalized tangent at parameter `t`.
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let [p0, p1, p2, p3] = self.points;
        cubic_derivative(p0, p1, p2, p3, t)
    }

    /// Orientation at parameter `t`, interpolated between the end orientations.
    pub fn rotation_at(&self, t: f32) -> Option<Quat> {
        self.rotations
            .map(|[start, end]| start.slerp(end, t.clamp(0.0, 1.0)))
    }

    /// O(1) length estimate, see [`fast_length_estimate`].
    pub fn fast_length_estimate(&self) -> f32 {
        let [p0, p1, p2, p3] = self.points;
        fast_length_estimate(p0, p1, p2, p3)
    }

    /// Resolution used for whole-curve queries at this segment's density.
    pub fn resolution(&self) -> usize {
        adaptive_resolution(self.fast_length_estimate(), self.res_per_meter)
    }

    /// Arc length using adaptive resolution.
    pub fn length(&self) -> f32 {
        estimate_length(self, self.resolution())
    }

    /// Arc length at an explicit sampling density.
    pub fn length_with_density(&self, res_per_meter: usize) -> SplineResult<f32> {
        check_density(res_per_meter)?;
        let resolution = adaptive_resolution(self.fast_length_estimate(), res_per_meter);
        Ok(estimate_length(self, resolution))
    }

    /// Arc length at a fixed resolution.
    pub fn length_at_resolution(&self, resolution: usize) -> f32 {
        estimate_length(self, resolution)
    }

    /// Parameter reached after travelling `distance` from `start`.
    ///
    /// Returns `0.0` or `1.0` when the walk leaves the segment.
    pub fn parameter_from_distance(&self, start: f32, distance: f32) -> SplineResult<f32> {
        self.walk(start, distance).map(|(t, _)| t)
    }

    /// Walk `distance` from `start`, returning `(t, travelled)`.
    ///
    /// `travelled` falls short of `|distance|` when the walk left the segment.
    pub fn walk(&self, start: f32, distance: f32) -> SplineResult<(f32, f32)> {
        if distance == 0.0 {
            return walk_distance(self, 1, start, distance);
        }
        let resolution = distance_resolution(self.resolution(), distance);
        walk_distance(self, resolution, start, distance)
    }

    /// Position reached after travelling `distance` from `start`.
    pub fn point_from_distance(&self, start: f32, distance: f32) -> SplineResult<Vec3> {
        self.parameter_from_distance(start, distance)
            .map(|t| self.point_at(t))
    }

    /// Parameters spaced `distance` apart along the segment.
    pub fn equal_distance_parameters(&self, distance: f32) -> SplineResult<Vec<f32>> {
        let resolution = distance_resolution(self.resolution(), distance);
        equal_distance_parameters(self, distance, resolution)
    }

    /// Positions spaced `distance` apart along the segment.
    pub fn equal_distance_points(&self, distance: f32) -> SplineResult<Vec<Vec3>> {
        Ok(self
            .equal_distance_parameters(distance)?
            .into_iter()
            .map(|t| self.point_at(t))
            .collect())
    }

    /// New segment with every point transformed by `matrix` and every
    /// orientation premultiplied by its rotation.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let (_, rotation, _) = matrix.to_scale_rotation_translation();
        Self {
            points: self.points.map(|p| matrix.transform_point3(p)),
            rotations: self.rotations.map(|r| r.map(|q| rotation * q)),
            res_per_meter: self.res_per_meter,
        }
    }
}

impl BezierEvaluator for CubicBezier {
    fn evaluate(&self, t: f32) -> Vec3 {
        self.point_at(t)
    }
}

/// A quadratic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    /// Control points; 0 and 2 are on the curve.
    pub points: [Vec3; 3],
    /// Samples per metre used by length and distance queries.
    pub res_per_meter: usize,
}

impl QuadraticBezier {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self {
            points: [p0, p1, p2],
            res_per_meter: DEFAULT_RES_PER_METER,
        }
    }

    pub fn with_density(mut self, res_per_meter: usize) -> Self {
        self.res_per_meter = res_per_meter.max(1);
        self
    }

    pub fn point(&self, index: usize) -> SplineResult<Vec3> {
        SplineError::check_index(index, self.points.len())?;
        Ok(self.points[index])
    }

    pub fn with_point(mut self, index: usize, position: Vec3) -> SplineResult<Self> {
        SplineError::check_index(index, self.points.len())?;
        self.points[index] = position;
        Ok(self)
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        let [p0, p1, p2] = self.points;
        quadratic_point(p0, p1, p2, t)
    }

    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let [p0, p1, p2] = self.points;
        quadratic_derivative(p0, p1, p2, t)
    }

    pub fn fast_length_estimate(&self) -> f32 {
        let [p0, p1, p2] = self.points;
        quadratic_fast_length_estimate(p0, p1, p2)
    }

    pub fn resolution(&self) -> usize {
        adaptive_resolution(self.fast_length_estimate(), self.res_per_meter)
    }

    pub fn length(&self) -> f32 {
        estimate_length(self, self.resolution())
    }

    pub fn parameter_from_distance(&self, start: f32, distance: f32) -> SplineResult<f32> {
        if distance == 0.0 {
            return parameter_at_distance(self, 1, start, distance);
        }
        let resolution = distance_resolution(self.resolution(), distance);
        parameter_at_distance(self, resolution, start, distance)
    }

    pub fn point_from_distance(&self, start: f32, distance: f32) -> SplineResult<Vec3> {
        self.parameter_from_distance(start, distance)
            .map(|t| self.point_at(t))
    }

    pub fn equal_distance_points(&self, distance: f32) -> SplineResult<Vec<Vec3>> {
        let resolution = distance_resolution(self.resolution(), distance);
        Ok(equal_distance_parameters(self, distance, resolution)?
            .into_iter()
            .map(|t| self.point_at(t))
            .collect())
    }

    pub fn transform(&self, matrix: &Mat4) -> Self {
        Self {
            points: self.points.map(|p| matrix.transform_point3(p)),
            res_per_meter: self.res_per_meter,
        }
    }
}

impl BezierEvaluator for QuadraticBezier {
    fn evaluate(&self, t: f32) -> Vec3 {
        self.point_at(t)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn seed() -> CubicBezier {
        CubicBezier::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_adaptive_length_close_to_fixed() {
        let curve = seed();
        let fixed = curve.length_at_resolution(10_000);
        assert!((curve.length() - fixed).abs() < 1e-3);
    }

    #[test]
    fn test_longer_curves_get_more_samples() {
        let short = seed();
        let long = short.transform(&Mat4::from_scale(Vec3::splat(10.0)));
        assert!(long.resolution() > short.resolution());
        assert!((long.length() - short.length() * 10.0).abs() < 0.05);
    }

    #[test]
    fn test_point_index_out_of_range() {
        let curve = seed();
        assert_eq!(curve.point(3).unwrap(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            curve.point(4),
            Err(SplineError::IndexOutOfRange { index: 4, len: 4 })
        );
        let quad = QuadraticBezier::new(Vec3::ZERO, Vec3::Y, Vec3::X);
        assert!(quad.point(3).is_err());
        assert!(quad.with_point(1, Vec3::Z).is_ok());
    }

    #[test]
    fn test_point_from_small_distance() {
        let line = CubicBezier::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        );
        let p = line.point_from_distance(0.0, 0.01).unwrap();
        assert!((p.x - 0.01).abs() < 1e-3, "got {p}");
        let p = line.point_from_distance(0.0, 2.0).unwrap();
        assert!((p.x - 2.0).abs() < 1e-2, "got {p}");
    }

    #[test]
    fn test_equal_distance_points_spacing() {
        let line = CubicBezier::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        );
        let points = line.equal_distance_points(0.7).unwrap();
        assert_eq!(points.len(), 4);
        for (i, p) in points.iter().enumerate() {
            assert!((p.x - 0.7 * (i + 1) as f32).abs() < 0.01);
        }
        assert!(line.equal_distance_points(0.0).is_err());
    }

    #[test]
    fn test_transform_is_pure() {
        let curve = seed().with_rotations(Quat::IDENTITY, Quat::IDENTITY);
        let matrix = Mat4::from_rotation_translation(
            Quat::from_rotation_y(FRAC_PI_2),
            Vec3::new(0.0, 5.0, 0.0),
        );
        let moved = curve.transform(&matrix);

        assert_eq!(curve, seed().with_rotations(Quat::IDENTITY, Quat::IDENTITY));
        assert!((moved.points[3] - Vec3::new(0.0, 5.0, -1.0)).length() < 1e-5);
        let [start, _] = moved.rotations.unwrap();
        assert!(start.dot(Quat::from_rotation_y(FRAC_PI_2)).abs() > 1.0 - 1e-5);
        assert!((moved.length() - curve.length()).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_at_slerps() {
        let end = Quat::from_rotation_z(FRAC_PI_2);
        let curve = seed().with_rotations(Quat::IDENTITY, end);
        let half = curve.rotation_at(0.5).unwrap();
        assert!(half.dot(Quat::from_rotation_z(FRAC_PI_2 / 2.0)).abs() > 1.0 - 1e-5);
        assert!(seed().rotation_at(0.5).is_none());
    }

    #[test]
    fn test_quadratic_length() {
        let quad = QuadraticBezier::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert!((quad.length() - 2.0).abs() < 1e-3);
    }
}
