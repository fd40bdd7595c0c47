//! Arc length utilities for Bézier curves.
//!
//! Lengths are piecewise-linear approximations: the curve is sampled at
//! `resolution` uniform steps of `t` and consecutive chord lengths are summed.
//! The inverse lookup (distance to `t`) walks the same chords, so its cost is
//! bounded by the resolution rather than by a root-finding tolerance.

use bevy::prelude::*;

use super::{BezierEvaluator, SplineError, SplineResult};

/// Default number of samples for fixed-resolution length queries.
pub const DEFAULT_RESOLUTION: usize = 1000;

/// Estimate the arc length of a curve by summing `resolution` chords.
///
/// A resolution of zero yields a length of zero.
pub fn estimate_length<C: BezierEvaluator + ?Sized>(curve: &C, resolution: usize) -> f32 {
    let mut length = 0.0;
    let mut prev_point = curve.evaluate(0.0);

    for i in 1..=resolution {
        let t = i as f32 / resolution as f32;
        let point = curve.evaluate(t);
        length += prev_point.distance(point);
        prev_point = point;
    }

    length
}

/// Find the parameter reached by travelling `distance` along the curve from `start`.
///
/// Walks forward for positive distances and backward for negative ones in
/// steps of `1 / resolution`, stopping at the first step where the travelled
/// chord length reaches `|distance|`. Walking off either end of the curve is
/// not an error: the clamped boundary (`0.0` or `1.0`) is returned and the
/// caller can compare against it.
pub fn parameter_at_distance<C: BezierEvaluator + ?Sized>(
    curve: &C,
    resolution: usize,
    start: f32,
    distance: f32,
) -> SplineResult<f32> {
    walk_distance(curve, resolution, start, distance).map(|(t, _)| t)
}

/// Like [`parameter_at_distance`], but also returns the chord length
/// actually travelled, which is shorter than `|distance|` when the walk
/// stopped at an end of the curve.
pub fn walk_distance<C: BezierEvaluator + ?Sized>(
    curve: &C,
    resolution: usize,
    start: f32,
    distance: f32,
) -> SplineResult<(f32, f32)> {
    if resolution == 0 {
        return Err(SplineError::invalid("resolution must be greater than zero"));
    }
    if !start.is_finite() || !distance.is_finite() {
        return Err(SplineError::invalid(format!(
            "start ({start}) and distance ({distance}) must be finite"
        )));
    }
    let start = start.clamp(0.0, 1.0);
    if distance == 0.0 {
        return Ok((start, 0.0));
    }

    let step = distance.signum() / resolution as f32;
    let target = distance.abs();

    let mut travelled = 0.0;
    let mut prev_point = curve.evaluate(start);
    let mut i = 0usize;

    loop {
        i += 1;
        let t = (start + i as f32 * step).clamp(0.0, 1.0);
        let point = curve.evaluate(t);
        travelled += prev_point.distance(point);

        if travelled >= target {
            return Ok((t, travelled));
        }
        if (step > 0.0 && t >= 1.0) || (step < 0.0 && t <= 0.0) {
            return Ok((t, travelled));
        }

        prev_point = point;
    }
}

/// Parameters spaced `segment_length` apart along the curve, starting from `t = 0`.
///
/// Returns exactly `floor(curve_length / segment_length)` values, where the
/// curve length is measured at the same resolution. Each value is the first
/// sample at or past the next multiple of `segment_length`. The start of the
/// curve itself is not included.
pub fn equal_distance_parameters<C: BezierEvaluator + ?Sized>(
    curve: &C,
    segment_length: f32,
    resolution: usize,
) -> SplineResult<Vec<f32>> {
    if resolution == 0 {
        return Err(SplineError::invalid("resolution must be greater than zero"));
    }
    if !segment_length.is_finite() || segment_length <= 0.0 {
        return Err(SplineError::invalid(format!(
            "segment length must be positive, got {segment_length}"
        )));
    }

    let count = (estimate_length(curve, resolution) / segment_length).floor() as usize;
    let mut params = Vec::with_capacity(count);
    let mut travelled = 0.0;
    let mut prev_point = curve.evaluate(0.0);
    let mut i = 0;

    while params.len() < count && i < resolution {
        i += 1;
        let t = i as f32 / resolution as f32;
        let point = curve.evaluate(t);
        travelled += prev_point.distance(point);
        prev_point = point;

        while params.len() < count && travelled >= (params.len() + 1) as f32 * segment_length {
            params.push(t);
        }
    }

    // `count * segment_length` can round a hair past the measured length.
    params.resize(count, 1.0);
    Ok(params)
}
