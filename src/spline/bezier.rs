use bevy::prelude::*;

/// Trait for curves that can be evaluated at a parameter `t` in `[0, 1]`.
///
/// Implemented for raw control point arrays so the arc-length functions in
/// [`super::arc_length`] stay pure functions over points.
pub trait BezierEvaluator {
    /// Evaluate the curve at parameter `t`. `t` is not clamped.
    fn evaluate(&self, t: f32) -> Vec3;
}

impl BezierEvaluator for [Vec3; 3] {
    fn evaluate(&self, t: f32) -> Vec3 {
        quadratic_point(self[0], self[1], self[2], t)
    }
}

impl BezierEvaluator for [Vec3; 4] {
    fn evaluate(&self, t: f32) -> Vec3 {
        cubic_point(self[0], self[1], self[2], self[3], t)
    }
}

/// Point on a quadratic Bézier curve (De Casteljau).
pub fn quadratic_point(p0: Vec3, p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    a.lerp(b, t)
}

/// Point on a cubic Bézier curve, built from two quadratic evaluations.
pub fn cubic_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let a = quadratic_point(p0, p1, p2, t);
    let b = quadratic_point(p1, p2, p3, t);
    a.lerp(b, t)
}

/// Point on a cubic Bézier curve from the explicit Bernstein polynomial.
pub fn cubic_bernstein(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;

    p0 * mt3 + p1 * 3.0 * mt2 * t + p2 * 3.0 * mt * t2 + p3 * t3
}

/// First derivative of a cubic Bézier curve.
pub fn cubic_derivative(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    (p1 - p0) * 3.0 * mt2 + (p2 - p1) * 6.0 * mt * t + (p3 - p2) * 3.0 * t2
}

/// First derivative of a quadratic Bézier curve.
pub fn quadratic_derivative(p0: Vec3, p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    (p1 - p0) * 2.0 * (1.0 - t) + (p2 - p1) * 2.0 * t
}

/// Cheap length estimate for a quadratic curve.
///
/// Weighted mean of the chord and the control polygon, exact for straight lines.
pub fn quadratic_fast_length_estimate(p0: Vec3, p1: Vec3, p2: Vec3) -> f32 {
    let chord = p0.distance(p2);
    let net = p0.distance(p1) + p1.distance(p2);
    (2.0 * chord + net) / 3.0
}

/// O(1) length estimate for a cubic curve.
///
/// Fits the quadratic through `p0`, the curve midpoint and `p3`, then
/// estimates that quadratic. Only meant for choosing a sampling resolution.
pub fn fast_length_estimate(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> f32 {
    let mid = cubic_point(p0, p1, p2, p3, 0.5);
    // Control point that makes the quadratic pass through `mid` at t = 0.5.
    let control = 2.0 * mid - 0.5 * (p0 + p3);
    quadratic_fast_length_estimate(p0, control, p3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: [Vec3; 4] = [
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ];

    #[test]
    fn test_cubic_matches_bernstein() {
        let odd = [
            Vec3::new(0.3, 2.0, -1.0),
            Vec3::new(4.0, -3.5, 2.0),
            Vec3::new(-2.0, 1.0, 7.0),
            Vec3::new(5.0, 5.0, 5.0),
        ];
        for points in [P, odd] {
            for i in 0..=100 {
                let t = i as f32 / 100.0;
                let casteljau = cubic_point(points[0], points[1], points[2], points[3], t);
                let bernstein = cubic_bernstein(points[0], points[1], points[2], points[3], t);
                assert!((casteljau - bernstein).length() < 1e-4, "t = {t}");
            }
        }
    }

    #[test]
    fn test_endpoints() {
        assert!((P.evaluate(0.0) - P[0]).length() < 1e-6);
        assert!((P.evaluate(1.0) - P[3]).length() < 1e-6);

        let q = [Vec3::ZERO, Vec3::Y, Vec3::X];
        assert!((q.evaluate(0.0) - Vec3::ZERO).length() < 1e-6);
        assert!((q.evaluate(1.0) - Vec3::X).length() < 1e-6);
        assert!((q.evaluate(0.5) - Vec3::new(0.25, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let h = 1e-3;
        for t in [0.1, 0.5, 0.9] {
            let numeric = (P.evaluate(t + h) - P.evaluate(t - h)) / (2.0 * h);
            let analytic = cubic_derivative(P[0], P[1], P[2], P[3], t);
            assert!((numeric - analytic).length() < 1e-2);
        }
    }

    #[test]
    fn test_fast_estimate_exact_for_lines() {
        let a = Vec3::ZERO;
        let b = Vec3::new(3.0, 4.0, 0.0);
        let estimate = fast_length_estimate(a, a.lerp(b, 1.0 / 3.0), a.lerp(b, 2.0 / 3.0), b);
        assert!((estimate - 5.0).abs() < 1e-4);
    }
}
