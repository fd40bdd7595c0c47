use bevy::prelude::*;

use super::BezierPath;

/// An immutable snapshot of a [`BezierPath`] for coarse-grained undo.
///
/// Holds a deep copy of the points, rotations and topology flags. The
/// checkpoint list of the path itself is not captured.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct PathCheckpoint {
    points: Vec<Vec3>,
    rotations: Vec<Quat>,
    is_closed: bool,
    is_2d: bool,
}

impl PathCheckpoint {
    /// Snapshot the current state of `path`.
    pub fn capture(path: &BezierPath) -> Self {
        Self {
            points: path.points().to_vec(),
            rotations: path.rotations().to_vec(),
            is_closed: path.is_closed(),
            is_2d: path.is_2d(),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn is_2d(&self) -> bool {
        self.is_2d
    }

    /// Clone out the stored state as `(points, rotations, is_closed, is_2d)`.
    pub(crate) fn to_state(&self) -> (Vec<Vec3>, Vec<Quat>, bool, bool) {
        (
            self.points.clone(),
            self.rotations.clone(),
            self.is_closed,
            self.is_2d,
        )
    }
}
