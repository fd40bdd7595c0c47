use bevy::prelude::*;

use super::checkpoint::PathCheckpoint;
use super::segment::CubicBezier;
use super::{SplineError, SplineResult};

/// A chain of cubic Bézier segments sharing their end points.
///
/// Every third point (`i % 3 == 0`) is an anchor the curve passes through;
/// the two points between consecutive anchors are control points. An open
/// path with `S` segments stores `3 * S + 1` points and `S + 1` rotations; a
/// closed path stores `3 * S` points and `S` rotations, and index arithmetic
/// wraps around the end.
///
/// The point and rotation lists are only reachable through methods so that
/// the topology and continuity invariants hold after every edit.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
pub struct BezierPath {
    points: Vec<Vec3>,
    rotations: Vec<Quat>,
    is_2d: bool,
    is_closed: bool,
    checkpoints: Vec<PathCheckpoint>,
}

impl Default for BezierPath {
    fn default() -> Self {
        Self::new()
    }
}

impl BezierPath {
    /// Create the default single-segment S-curve around the origin.
    pub fn new() -> Self {
        Self::from_centre(Vec3::ZERO)
    }

    /// Create the default single-segment S-curve around `centre`.
    pub fn from_centre(centre: Vec3) -> Self {
        let points = vec![
            centre + Vec3::NEG_X,
            centre + (Vec3::NEG_X + Vec3::Y) * 0.5,
            centre + (Vec3::X + Vec3::NEG_Y) * 0.5,
            centre + Vec3::X,
        ];
        Self::with_state(points, vec![Quat::IDENTITY; 2], false)
    }

    /// Create a path from explicit points and per-anchor rotations.
    ///
    /// Fails with `InvalidArgument` if the point or rotation counts do not
    /// describe at least one open or two closed segments.
    pub fn from_points(points: Vec<Vec3>, rotations: Vec<Quat>, closed: bool) -> SplineResult<Self> {
        let valid_points = if closed {
            points.len() >= 6 && points.len() % 3 == 0
        } else {
            points.len() >= 4 && points.len() % 3 == 1
        };
        if !valid_points {
            return Err(SplineError::invalid(format!(
                "{} points do not form a{} Bézier path",
                points.len(),
                if closed { " closed" } else { "n open" }
            )));
        }

        let segments = Self::segment_count(points.len(), closed);
        let expected_rotations = if closed { segments } else { segments + 1 };
        if rotations.len() != expected_rotations {
            return Err(SplineError::invalid(format!(
                "expected {expected_rotations} rotations, got {}",
                rotations.len()
            )));
        }

        Ok(Self::with_state(points, rotations, closed))
    }

    fn with_state(points: Vec<Vec3>, rotations: Vec<Quat>, closed: bool) -> Self {
        let mut path = Self {
            points,
            rotations,
            is_2d: false,
            is_closed: closed,
            checkpoints: Vec::new(),
        };
        path.create_checkpoint();
        path
    }

    fn segment_count(num_points: usize, closed: bool) -> usize {
        if closed {
            num_points / 3
        } else {
            num_points.saturating_sub(1) / 3
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_segments(&self) -> usize {
        Self::segment_count(self.points.len(), self.is_closed)
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn is_2d(&self) -> bool {
        self.is_2d
    }

    /// Whether point `index` is an anchor.
    pub fn is_anchor(&self, index: usize) -> bool {
        index % 3 == 0
    }

    /// Point at `index`.
    pub fn point(&self, index: usize) -> SplineResult<Vec3> {
        SplineError::check_index(index, self.points.len())?;
        Ok(self.points[index])
    }

    /// Wrap a possibly negative point index into `0..num_points`.
    pub fn loop_index(&self, index: isize) -> usize {
        index.rem_euclid(self.points.len() as isize) as usize
    }

    fn loop_rotation_index(&self, index: usize) -> usize {
        index % self.rotations.len()
    }

    fn flatten(&self, point: Vec3) -> Vec3 {
        if self.is_2d {
            point.with_z(0.0)
        } else {
            point
        }
    }

    /// Constrain the path to the XY plane. Enabling flattens every point.
    pub fn set_is_2d(&mut self, is_2d: bool) {
        self.is_2d = is_2d;
        if is_2d {
            for point in &mut self.points {
                point.z = 0.0;
            }
        }
    }

    /// Switch between open and closed topology.
    ///
    /// Closing appends two control points mirrored from the current end
    /// tangents; opening removes them again.
    pub fn toggle_closed(&mut self) {
        self.is_closed = !self.is_closed;

        if self.is_closed {
            let n = self.points.len();
            let out = self.points[n - 1] * 2.0 - self.points[n - 2];
            let back = self.points[0] * 2.0 - self.points[1];
            self.points.push(out);
            self.points.push(back);
        } else {
            let n = self.points.len();
            self.points.truncate(n - 2);
        }

        debug!(closed = self.is_closed, segments = self.num_segments(), "toggled path topology");
    }

    /// Extend the path with a new anchor.
    ///
    /// The new entry control point reflects the previous control across the
    /// last anchor so the curve continues in its current direction. On a
    /// closed path the closing segment is split instead.
    pub fn add_segment(&mut self, anchor: Vec3, rotation: Quat) {
        let anchor = self.flatten(anchor);

        if self.is_closed {
            let last = self.num_segments() - 1;
            self.split_segment(last, anchor, Some(rotation));
            return;
        }

        let n = self.points.len();
        let control = self.points[n - 1] * 2.0 - self.points[n - 2];
        self.points.push(control);
        self.points.push((control + anchor) * 0.5);
        self.points.push(anchor);
        self.rotations.push(rotation);

        debug!(segments = self.num_segments(), "added path segment");
    }

    /// Add a segment without choosing where it goes.
    ///
    /// An open path continues past its last anchor by half the last segment's
    /// span. A closed path gets a new anchor midway along its closing segment.
    pub fn extend(&mut self) {
        let n = self.points.len();
        let (anchor, rotation) = if self.is_closed {
            let last = self.rotations.len() - 1;
            (
                (self.points[n - 2] + self.points[0]) * 0.5,
                self.rotations[last].slerp(self.rotations[0], 0.5),
            )
        } else {
            let end = self.points[n - 1];
            (end * 2.0 - (end + self.points[n - 4]) * 0.5, Quat::IDENTITY)
        };
        self.add_segment(anchor, rotation);
    }

    /// Split segment `index` at a new anchor placed at `position`.
    ///
    /// Both new control points start at `position`. Without an explicit
    /// rotation the new anchor takes the halfway slerp of the segment's end
    /// rotations.
    pub fn insert_segment(
        &mut self,
        index: usize,
        position: Vec3,
        rotation: Option<Quat>,
    ) -> SplineResult<()> {
        SplineError::check_index(index, self.num_segments())?;
        let position = self.flatten(position);
        self.split_segment(index, position, rotation);
        Ok(())
    }

    fn split_segment(&mut self, index: usize, position: Vec3, rotation: Option<Quat>) {
        let rotation = rotation.unwrap_or_else(|| {
            let start = self.rotations[index];
            let end = self.rotations[self.loop_rotation_index(index + 1)];
            start.slerp(end, 0.5)
        });

        let at = index * 3 + 2;
        self.points.splice(at..at, [position; 3]);
        self.rotations.insert(index + 1, rotation);

        debug!(index, segments = self.num_segments(), "inserted path segment");
    }

    /// Remove the segment owned by the anchor at `anchor_index`.
    ///
    /// Returns `false` without changing anything if the index is not an
    /// anchor, or if the path would drop below one segment (open) or two
    /// segments (closed).
    pub fn delete_segment(&mut self, anchor_index: usize) -> bool {
        let n = self.points.len();
        if anchor_index >= n || !self.is_anchor(anchor_index) {
            debug!(anchor_index, "refused to delete segment: not an anchor");
            return false;
        }

        let segments = self.num_segments();
        let allowed = if self.is_closed { segments > 2 } else { segments > 1 };
        if !allowed {
            debug!(segments, closed = self.is_closed, "refused to delete last segments");
            return false;
        }

        if anchor_index == 0 {
            if self.is_closed {
                // Keep the seam: the control leading into the old second
                // anchor becomes the control closing the loop.
                self.points[n - 1] = self.points[2];
            }
            self.points.drain(0..3);
        } else if anchor_index == n - 1 && !self.is_closed {
            self.points.drain(anchor_index - 2..=anchor_index);
        } else {
            self.points.drain(anchor_index - 1..=anchor_index + 1);
        }
        self.rotations.remove(anchor_index / 3);

        debug!(anchor_index, segments = self.num_segments(), "deleted path segment");
        true
    }

    /// Move point `index` to `position`, keeping the curve smooth.
    ///
    /// Moving an anchor drags both neighbouring control points along by the
    /// same offset. Moving a control point swings the paired control on the
    /// other side of the anchor onto the opposite ray, at its original
    /// distance from the anchor.
    pub fn move_point(&mut self, index: usize, position: Vec3) -> SplineResult<()> {
        let n = self.points.len();
        SplineError::check_index(index, n)?;

        let position = self.flatten(position);
        let delta = position - self.points[index];
        self.points[index] = position;

        let i = index as isize;
        if self.is_anchor(index) {
            if index + 1 < n || self.is_closed {
                let next = self.loop_index(i + 1);
                self.points[next] = self.flatten(self.points[next] + delta);
            }
            if index >= 1 || self.is_closed {
                let prev = self.loop_index(i - 1);
                self.points[prev] = self.flatten(self.points[prev] + delta);
            }
        } else {
            let next_is_anchor = (index + 1) % 3 == 0;
            let (paired, anchor) = if next_is_anchor {
                (i + 2, i + 1)
            } else {
                (i - 2, i - 1)
            };

            if (0..n as isize).contains(&paired) || self.is_closed {
                let paired = self.loop_index(paired);
                let anchor = self.points[self.loop_index(anchor)];
                let distance = anchor.distance(self.points[paired]);
                if let Some(direction) = (anchor - position).try_normalize() {
                    self.points[paired] = self.flatten(anchor + direction * distance);
                }
            }
        }

        Ok(())
    }

    /// Overwrite the rotation of the anchor at `anchor_index`.
    pub fn rotate_point(&mut self, anchor_index: usize, rotation: Quat) -> SplineResult<()> {
        SplineError::check_index(anchor_index, self.points.len())?;
        if !self.is_anchor(anchor_index) {
            return Err(SplineError::invalid(format!(
                "point {anchor_index} is a control point and has no rotation"
            )));
        }
        self.rotations[anchor_index / 3] = rotation;
        Ok(())
    }

    /// Rotation of the anchor at `anchor_index`.
    pub fn rotation(&self, anchor_index: usize) -> SplineResult<Quat> {
        SplineError::check_index(anchor_index, self.points.len())?;
        if !self.is_anchor(anchor_index) {
            return Err(SplineError::invalid(format!(
                "point {anchor_index} is a control point and has no rotation"
            )));
        }
        Ok(self.rotations[anchor_index / 3])
    }

    /// The cubic segment `index` as a standalone value.
    pub fn segment(&self, index: usize) -> SplineResult<CubicBezier> {
        SplineError::check_index(index, self.num_segments())?;
        Ok(self.build_segment(index))
    }

    fn build_segment(&self, index: usize) -> CubicBezier {
        let i = index * 3;
        CubicBezier::new(
            self.points[i],
            self.points[i + 1],
            self.points[i + 2],
            self.points[self.loop_index(i as isize + 3)],
        )
        .with_rotations(
            self.rotations[index],
            self.rotations[self.loop_rotation_index(index + 1)],
        )
    }

    /// Iterate over every segment in order.
    pub fn segments(&self) -> impl Iterator<Item = CubicBezier> + '_ {
        (0..self.num_segments()).map(|i| self.build_segment(i))
    }

    /// Total arc length using each segment's adaptive resolution.
    pub fn length(&self) -> f32 {
        self.segments().map(|segment| segment.length()).sum()
    }

    /// Total arc length with an explicit resolution per segment.
    pub fn length_with_resolutions(&self, resolutions: &[usize]) -> SplineResult<f32> {
        let segments = self.num_segments();
        if resolutions.len() != segments {
            return Err(SplineError::invalid(format!(
                "expected {segments} resolutions, got {}",
                resolutions.len()
            )));
        }
        Ok(self
            .segments()
            .zip(resolutions)
            .map(|(segment, &resolution)| segment.length_at_resolution(resolution))
            .sum())
    }

    /// Split a path progress into `(segment, local t)`.
    ///
    /// Progress runs from `0` to `num_segments()`, with integers landing on
    /// anchors. Out-of-range values are clamped; the exact end maps to the
    /// last segment at `t = 1`.
    pub fn locate(&self, progress: f32) -> (usize, f32) {
        let segments = self.num_segments();
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, segments as f32)
        };

        if progress >= segments as f32 {
            (segments - 1, 1.0)
        } else {
            let index = progress.floor() as usize;
            (index, progress - index as f32)
        }
    }

    /// Local-space position at `progress`.
    pub fn position_at(&self, progress: f32) -> Vec3 {
        let (index, t) = self.locate(progress);
        self.build_segment(index).point_at(t)
    }

    /// Local-space tangent at `progress`.
    pub fn tangent_at(&self, progress: f32) -> Vec3 {
        let (index, t) = self.locate(progress);
        self.build_segment(index).tangent_at(t)
    }

    /// Local-space orientation at `progress`, slerped between anchor rotations.
    pub fn orientation_at(&self, progress: f32) -> Quat {
        let (index, t) = self.locate(progress);
        let start = self.rotations[index];
        let end = self.rotations[self.loop_rotation_index(index + 1)];
        start.slerp(end, t)
    }

    /// Points spaced `spacing` apart along each segment in turn.
    pub fn equal_distance_points(&self, spacing: f32) -> SplineResult<Vec<Vec3>> {
        let mut points = Vec::new();
        for segment in self.segments() {
            points.extend(segment.equal_distance_points(spacing)?);
        }
        Ok(points)
    }

    /// Snapshot the current state onto the checkpoint list.
    pub fn create_checkpoint(&mut self) {
        let checkpoint = PathCheckpoint::capture(self);
        self.checkpoints.push(checkpoint);
        debug!(count = self.checkpoints.len(), "created path checkpoint");
    }

    /// Restore checkpoint `index`, or the most recent one.
    pub fn load_checkpoint(&mut self, index: Option<usize>) -> SplineResult<()> {
        let len = self.checkpoints.len();
        let index = index.unwrap_or(len.saturating_sub(1));
        SplineError::check_index(index, len)?;

        let (points, rotations, is_closed, is_2d) = self.checkpoints[index].to_state();
        self.points = points;
        self.rotations = rotations;
        self.is_closed = is_closed;
        self.is_2d = is_2d;

        debug!(index, "loaded path checkpoint");
        Ok(())
    }

    /// Delete checkpoint `index`, or the most recent one.
    ///
    /// The root checkpoint (index 0) is never deleted.
    pub fn delete_checkpoint(&mut self, index: Option<usize>) -> bool {
        let len = self.checkpoints.len();
        let index = index.unwrap_or(len.saturating_sub(1));
        if index == 0 || index >= len {
            return false;
        }
        self.checkpoints.remove(index);
        true
    }

    pub fn checkpoints(&self) -> &[PathCheckpoint] {
        &self.checkpoints
    }

    pub fn num_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_invariants(path: &BezierPath) {
        let segments = path.num_segments();
        let extra = if path.is_closed() { 0 } else { 1 };
        assert_eq!(path.num_points(), 3 * segments + extra);
        assert_eq!(path.rotations().len(), segments + extra);
    }

    fn three_segment_path() -> BezierPath {
        let mut path = BezierPath::new();
        path.add_segment(Vec3::new(3.0, 1.0, 0.0), Quat::IDENTITY);
        path.add_segment(Vec3::new(5.0, -1.0, 2.0), Quat::IDENTITY);
        path
    }

    #[test]
    fn test_seed_path() {
        let path = BezierPath::new();
        assert_eq!(path.num_segments(), 1);
        assert_eq!(path.point(1).unwrap(), Vec3::new(-0.5, 0.5, 0.0));
        assert_eq!(path.num_checkpoints(), 1);
        assert_invariants(&path);
    }

    #[test]
    fn test_add_segment_count() {
        for n in 0..6 {
            let mut path = BezierPath::new();
            for i in 0..n {
                path.add_segment(Vec3::new(2.0 + i as f32, 0.0, 0.0), Quat::IDENTITY);
            }
            assert_eq!(path.num_segments(), n + 1);
            assert_invariants(&path);
        }
    }

    #[test]
    fn test_add_segment_extends_smoothly() {
        let mut path = BezierPath::new();
        path.add_segment(Vec3::new(3.0, 0.0, 0.0), Quat::IDENTITY);
        // Reflection of (0.5, -0.5) across the anchor (1, 0).
        assert_eq!(path.point(4).unwrap(), Vec3::new(1.5, 0.5, 0.0));
        assert_eq!(path.point(5).unwrap(), Vec3::new(2.25, 0.25, 0.0));
        assert_eq!(path.point(6).unwrap(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_add_segment_on_closed_path_splits_closing_segment() {
        let mut path = three_segment_path();
        path.toggle_closed();
        let before = path.num_segments();
        path.add_segment(Vec3::new(0.0, -3.0, 0.0), Quat::IDENTITY);
        assert!(path.is_closed());
        assert_eq!(path.num_segments(), before + 1);
        assert_eq!(path.point(3 * before).unwrap(), Vec3::new(0.0, -3.0, 0.0));
        assert_invariants(&path);
    }

    #[test]
    fn test_extend_open_path_continues_past_end() {
        let mut path = BezierPath::new();
        path.extend();
        assert_eq!(path.num_segments(), 2);
        assert_invariants(&path);
        assert_eq!(path.point(6).unwrap(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(path.rotation(2).unwrap(), Quat::IDENTITY);
    }

    #[test]
    fn test_extend_closed_path_splits_closing_segment() {
        let points = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        let rotations = vec![Quat::IDENTITY, Quat::from_rotation_z(FRAC_PI_2)];
        let mut path = BezierPath::from_points(points, rotations, true).unwrap();

        path.extend();
        assert!(path.is_closed());
        assert_eq!(path.num_segments(), 3);
        assert_invariants(&path);
        assert!((path.point(6).unwrap() - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
        let expected = Quat::from_rotation_z(FRAC_PI_2 / 2.0);
        assert!(path.rotation(2).unwrap().dot(expected).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_toggle_closed_round_trip() {
        let mut path = three_segment_path();
        let points = path.points().to_vec();
        let rotations = path.rotations().to_vec();

        path.toggle_closed();
        assert!(path.is_closed());
        assert_eq!(path.num_segments(), 4);
        assert_invariants(&path);

        path.toggle_closed();
        assert!(!path.is_closed());
        assert_eq!(path.points(), points.as_slice());
        assert_eq!(path.rotations(), rotations.as_slice());
    }

    #[test]
    fn test_insert_segment_default_rotation() {
        let mut path = BezierPath::new();
        path.rotate_point(3, Quat::from_rotation_y(FRAC_PI_2)).unwrap();
        let position = Vec3::new(0.0, 2.0, 0.0);
        path.insert_segment(0, position, None).unwrap();

        assert_eq!(path.num_segments(), 2);
        assert_eq!(&path.points()[2..5], &[position; 3]);
        let mid = path.rotation(3).unwrap();
        assert!(mid.dot(Quat::from_rotation_y(FRAC_PI_2 / 2.0)).abs() > 1.0 - 1e-5);
        assert_invariants(&path);
    }

    #[test]
    fn test_insert_segment_out_of_range() {
        let mut path = BezierPath::new();
        assert_eq!(
            path.insert_segment(1, Vec3::ZERO, None),
            Err(SplineError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(path.num_segments(), 1);
    }

    #[test]
    fn test_delete_segment_limits() {
        let mut path = BezierPath::new();
        assert!(!path.delete_segment(0));
        assert!(!path.delete_segment(3));

        let mut path = three_segment_path();
        assert!(!path.delete_segment(1));
        assert!(!path.delete_segment(30));
        assert!(path.delete_segment(9));
        assert!(path.delete_segment(3));
        assert!(!path.delete_segment(0));
        assert_eq!(path.num_segments(), 1);
        assert_invariants(&path);
    }

    #[test]
    fn test_delete_segment_closed_minimum() {
        let mut path = BezierPath::new();
        path.toggle_closed();
        assert_eq!(path.num_segments(), 2);
        assert!(!path.delete_segment(0));
        assert!(!path.delete_segment(3));
    }

    #[test]
    fn test_delete_at_wrap_keeps_seam() {
        let mut path = BezierPath::new();
        path.add_segment(Vec3::new(3.0, 1.0, 0.0), Quat::IDENTITY);
        path.toggle_closed();
        assert_eq!(path.num_segments(), 3);

        let seam = path.point(2).unwrap();
        let second_anchor = path.point(3).unwrap();
        assert!(path.delete_segment(0));

        assert_eq!(path.num_segments(), 2);
        assert_eq!(path.point(0).unwrap(), second_anchor);
        assert_eq!(path.point(path.num_points() - 1).unwrap(), seam);
        assert_invariants(&path);
    }

    #[test]
    fn test_move_anchor_translates_neighbours() {
        let mut path = three_segment_path();
        let before = path.points().to_vec();
        let delta = Vec3::new(0.25, -1.0, 0.5);

        path.move_point(3, before[3] + delta).unwrap();

        assert_eq!(path.point(2).unwrap(), before[2] + delta);
        assert_eq!(path.point(4).unwrap(), before[4] + delta);
        assert_eq!(path.point(1).unwrap(), before[1]);
        assert_eq!(path.point(5).unwrap(), before[5]);
    }

    #[test]
    fn test_move_end_anchor_of_open_path() {
        let mut path = BezierPath::new();
        let before = path.points().to_vec();
        path.move_point(0, Vec3::new(-2.0, 0.0, 0.0)).unwrap();
        assert_eq!(path.point(1).unwrap(), before[1] + Vec3::NEG_X);
        assert_eq!(path.point(3).unwrap(), before[3]);
    }

    fn assert_mirrored(path: &BezierPath, moved: usize, paired: usize, anchor: usize, distance: f32) {
        let anchor = path.point(anchor).unwrap();
        let moved = path.point(moved).unwrap();
        let paired = path.point(paired).unwrap();
        assert!((anchor.distance(paired) - distance).abs() < 1e-4);
        let a = (moved - anchor).normalize();
        let b = (paired - anchor).normalize();
        assert!((a.dot(b) + 1.0).abs() < 1e-4, "controls are not opposite");
    }

    #[test]
    fn test_move_control_mirrors_pair() {
        let mut path = three_segment_path();
        let distance = path.point(3).unwrap().distance(path.point(4).unwrap());
        path.move_point(2, Vec3::new(0.0, 2.0, 1.0)).unwrap();
        assert_mirrored(&path, 2, 4, 3, distance);

        let distance = path.point(6).unwrap().distance(path.point(5).unwrap());
        path.move_point(7, Vec3::new(4.0, 4.0, -1.0)).unwrap();
        assert_mirrored(&path, 7, 5, 6, distance);
    }

    #[test]
    fn test_move_control_mirrors_across_closed_seam() {
        let mut path = three_segment_path();
        path.toggle_closed();
        let last = path.num_points() - 1;
        let distance = path.point(0).unwrap().distance(path.point(last).unwrap());
        path.move_point(1, Vec3::new(-1.0, 3.0, 0.0)).unwrap();
        assert_mirrored(&path, 1, last, 0, distance);

        let distance = path.point(0).unwrap().distance(path.point(1).unwrap());
        path.move_point(last, Vec3::new(-2.0, -2.0, 0.5)).unwrap();
        assert_mirrored(&path, last, 1, 0, distance);
    }

    #[test]
    fn test_move_point_out_of_range() {
        let mut path = BezierPath::new();
        assert!(matches!(
            path.move_point(4, Vec3::ZERO),
            Err(SplineError::IndexOutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn test_2d_flattens_points() {
        let mut path = three_segment_path();
        path.set_is_2d(true);
        assert!(path.points().iter().all(|p| p.z == 0.0));

        path.move_point(3, Vec3::new(1.0, 1.0, 5.0)).unwrap();
        path.add_segment(Vec3::new(9.0, 0.0, 3.0), Quat::IDENTITY);
        path.insert_segment(0, Vec3::new(0.0, 1.0, -2.0), None).unwrap();
        assert!(path.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_rotate_point_is_independent() {
        let mut path = three_segment_path();
        let rotation = Quat::from_rotation_x(1.0);
        path.rotate_point(6, rotation).unwrap();
        assert_eq!(path.rotations()[2], rotation);
        assert_eq!(path.rotations()[1], Quat::IDENTITY);
        assert!(path.rotate_point(5, rotation).is_err());
        assert!(path.rotate_point(30, rotation).is_err());
    }

    #[test]
    fn test_segment_wraps_on_closed_path() {
        let mut path = three_segment_path();
        path.toggle_closed();
        let last = path.segment(path.num_segments() - 1).unwrap();
        assert_eq!(last.points[3], path.point(0).unwrap());
        assert!(path.segment(path.num_segments()).is_err());
    }

    #[test]
    fn test_length_with_resolutions() {
        let path = three_segment_path();
        let fine = path.length_with_resolutions(&[1000, 1000, 1000]).unwrap();
        assert!((fine - path.length()).abs() < 0.01);
        assert!(matches!(
            path.length_with_resolutions(&[10, 10]),
            Err(SplineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_locate() {
        let path = three_segment_path();
        assert_eq!(path.locate(-1.0), (0, 0.0));
        assert_eq!(path.locate(1.5), (1, 0.5));
        assert_eq!(path.locate(3.0), (2, 1.0));
        assert_eq!(path.locate(7.0), (2, 1.0));
        assert!(path.position_at(1.0).distance(path.point(3).unwrap()) < 1e-5);
        assert!(path.position_at(3.0).distance(path.point(9).unwrap()) < 1e-5);
    }

    #[test]
    fn test_orientation_at_slerps() {
        let mut path = BezierPath::new();
        path.rotate_point(3, Quat::from_rotation_z(FRAC_PI_2)).unwrap();
        let half = path.orientation_at(0.5);
        assert!(half.dot(Quat::from_rotation_z(FRAC_PI_2 / 2.0)).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_checkpoint_round_trip_is_identity() {
        let mut path = three_segment_path();
        path.set_is_2d(true);
        let before = path.clone();

        path.create_checkpoint();
        path.load_checkpoint(None).unwrap();

        assert_eq!(path.points(), before.points());
        assert_eq!(path.rotations(), before.rotations());
        assert_eq!(path.is_closed(), before.is_closed());
        assert_eq!(path.is_2d(), before.is_2d());
    }

    #[test]
    fn test_checkpoint_restores_earlier_state() {
        let mut path = BezierPath::new();
        let seed = path.points().to_vec();
        path.add_segment(Vec3::new(4.0, 0.0, 0.0), Quat::IDENTITY);
        path.create_checkpoint();
        path.toggle_closed();

        path.load_checkpoint(Some(1)).unwrap();
        assert!(!path.is_closed());
        assert_eq!(path.num_segments(), 2);

        path.load_checkpoint(Some(0)).unwrap();
        assert_eq!(path.points(), seed.as_slice());
        assert!(path.load_checkpoint(Some(5)).is_err());
    }

    #[test]
    fn test_delete_checkpoint_keeps_root() {
        let mut path = BezierPath::new();
        assert!(!path.delete_checkpoint(None));
        path.create_checkpoint();
        path.create_checkpoint();
        assert!(!path.delete_checkpoint(Some(0)));
        assert!(!path.delete_checkpoint(Some(9)));
        assert!(path.delete_checkpoint(Some(1)));
        assert!(path.delete_checkpoint(None));
        assert!(!path.delete_checkpoint(None));
        assert_eq!(path.num_checkpoints(), 1);
    }

    #[test]
    fn test_from_points_validation() {
        let points = BezierPath::new().points().to_vec();
        assert!(BezierPath::from_points(points.clone(), vec![Quat::IDENTITY; 2], false).is_ok());
        assert!(BezierPath::from_points(points.clone(), vec![Quat::IDENTITY; 3], false).is_err());
        assert!(BezierPath::from_points(points[..3].to_vec(), vec![Quat::IDENTITY; 1], false).is_err());
        assert!(BezierPath::from_points(
            [points.clone(), points[..2].to_vec()].concat(),
            vec![Quat::IDENTITY; 2],
            true
        )
        .is_ok());
    }
}
