use bevy::prelude::*;

/// How the follower behaves when reaching the end of the path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum LoopMode {
    /// Stop at the end of the path.
    #[default]
    Once,
    /// Jump back to the start when reaching the end.
    Loop,
    /// Reverse direction at each end (ping-pong).
    PingPong,
}

/// Current state of a path follower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum FollowerState {
    /// Follower is actively moving.
    #[default]
    Playing,
    /// Follower is paused.
    Paused,
    /// Follower has finished (only for LoopMode::Once).
    Finished,
}

/// Where the follower takes its rotation from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Default)]
pub enum FollowerOrientation {
    /// Slerp between the rotations stored on the path's anchors.
    #[default]
    PathRotations,
    /// Point the entity's forward (-Z) along the curve tangent.
    AlignToTangent {
        /// Up vector used to constrain the rotation.
        up: Vec3,
    },
    /// Leave the entity's rotation alone.
    Keep,
}

/// A timed move toward a fixed progress value.
///
/// While a move is pending the follower ignores its speed and loop mode and
/// covers the remaining progress at a constant rate so that it arrives after
/// `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Default)]
pub struct ProgressTarget {
    /// Progress to stop at. Clamped to the path once it is known.
    pub target: f32,
    /// Seconds the whole move takes. Zero or less jumps straight there.
    pub duration: f32,
    /// Progress per second, fixed on the first update of the move.
    pub(crate) rate: Option<f32>,
}

impl Default for ProgressTarget {
    fn default() -> Self {
        Self {
            target: 0.0,
            duration: 1.0,
            rate: None,
        }
    }
}

impl ProgressTarget {
    pub fn new(target: f32, duration: f32) -> Self {
        Self {
            target,
            duration: duration.max(0.0),
            rate: None,
        }
    }
}

/// Component that moves an entity along a [`BezierPath`](crate::spline::BezierPath).
///
/// The entity's [`Transform`] is written in world space every frame, using
/// the path entity's [`GlobalTransform`] when it has one.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
pub struct PathFollower {
    /// The path entity to follow.
    pub path: Entity,

    /// Movement speed. World units per second with `constant_speed`,
    /// progress units (segments) per second otherwise.
    pub speed: f32,

    /// Current progress along the path, from `0` to the segment count.
    pub progress: f32,

    /// How to handle reaching the end of the path.
    pub loop_mode: LoopMode,

    /// Current playback state.
    pub state: FollowerState,

    /// Where the rotation comes from.
    pub orientation: FollowerOrientation,

    /// Direction of travel: 1.0 for forward, -1.0 for backward.
    /// Flipped internally in ping-pong mode.
    pub direction: f32,

    /// Offset applied in local space relative to the path position.
    pub offset: Vec3,

    /// Whether speed is measured along the arc rather than in progress units.
    pub constant_speed: bool,

    /// Pending timed move, see [`PathFollower::move_to_progress`].
    pub target: Option<ProgressTarget>,
}

impl Default for PathFollower {
    fn default() -> Self {
        Self {
            path: Entity::PLACEHOLDER,
            speed: 1.0,
            progress: 0.0,
            loop_mode: LoopMode::Once,
            state: FollowerState::Playing,
            orientation: FollowerOrientation::default(),
            direction: 1.0,
            offset: Vec3::ZERO,
            constant_speed: true,
            target: None,
        }
    }
}

impl PathFollower {
    /// Create a new follower for the given path entity.
    pub fn new(path: Entity) -> Self {
        Self {
            path,
            ..default()
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the starting progress. Clamped to be non-negative; the upper
    /// bound is applied once the path is known.
    pub fn with_start_progress(mut self, progress: f32) -> Self {
        self.progress = progress.max(0.0);
        self
    }

    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_orientation(mut self, orientation: FollowerOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Enable or disable arc-length speed.
    pub fn with_constant_speed(mut self, constant: bool) -> Self {
        self.constant_speed = constant;
        self
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        self.state = FollowerState::Playing;
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        self.state = FollowerState::Paused;
    }

    /// Reset to the start of the path.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.direction = 1.0;
        self.target = None;
        self.state = FollowerState::Playing;
    }

    /// Travel to `progress` over `seconds`, then pause there.
    ///
    /// Does nothing if the follower is already at `progress`.
    pub fn move_to_progress(&mut self, progress: f32, seconds: f32) {
        let progress = progress.max(0.0);
        if progress == self.progress {
            return;
        }
        self.target = Some(ProgressTarget::new(progress, seconds));
        self.state = FollowerState::Playing;
    }

    /// Travel to the anchor starting `segment` over `seconds`.
    pub fn move_to_segment(&mut self, segment: usize, seconds: f32) {
        self.move_to_progress(segment as f32, seconds);
    }

    /// Travel to the next anchor ahead over `seconds`.
    pub fn move_to_next_segment(&mut self, seconds: f32) {
        self.move_to_progress(self.progress.floor() + 1.0, seconds);
    }

    /// Whether a timed move is in progress.
    pub fn is_moving_to_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.state == FollowerState::Finished
    }

    pub fn is_playing(&self) -> bool {
        self.state == FollowerState::Playing
    }
}

/// Message emitted when a follower reaches a significant point.
#[derive(Message, Debug, Clone)]
pub struct FollowerEvent {
    /// The entity with the PathFollower component.
    pub entity: Entity,
    pub kind: FollowerEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerEventKind {
    /// Follower reached the end of the path (ping-pong mode).
    ReachedEnd,
    /// Follower reached the start of the path (ping-pong mode).
    ReachedStart,
    /// Follower wrapped around in loop mode.
    LoopCompleted,
    /// Follower stopped at an end (LoopMode::Once).
    Finished,
    /// A timed move arrived at its target.
    ReachedTarget,
}
