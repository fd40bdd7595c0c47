use bevy::prelude::*;

use crate::spline::{BezierPath, SamplingSettings, SplineQuery, SplineTransform};

use super::{
    FollowerEvent, FollowerEventKind, FollowerOrientation, FollowerState, LoopMode, PathFollower,
    ProgressTarget,
};

/// System that updates all path followers.
pub fn update_path_followers(
    mut followers: Query<(Entity, &mut PathFollower, &mut Transform)>,
    paths: Query<(&BezierPath, Option<&GlobalTransform>)>,
    settings: Res<SamplingSettings>,
    time: Res<Time>,
    mut events: MessageWriter<FollowerEvent>,
) {
    let delta = time.delta_secs();
    let res_per_meter = settings.res_per_meter.max(1);

    for (entity, mut follower, mut transform) in &mut followers {
        if follower.state != FollowerState::Playing {
            continue;
        }

        let Ok((path, path_transform)) = paths.get(follower.path) else {
            continue;
        };

        let matrix = path_transform.map_or(Mat4::IDENTITY, |g| g.world_matrix());
        let query = SplineQuery::new(path, matrix).with_density(res_per_meter);
        let max = query.max_progress();

        let (progress, direction, event) = if let Some(mut target) = follower.target {
            let (progress, arrived) = step_toward_target(&mut target, follower.progress, delta, max);
            if arrived {
                follower.target = None;
                follower.state = FollowerState::Paused;
                (progress, follower.direction, Some(FollowerEventKind::ReachedTarget))
            } else {
                follower.target = Some(target);
                (progress, follower.direction, None)
            }
        } else {
            let raw = if follower.constant_speed {
                let distance = follower.speed * delta * follower.direction;
                match query.advance(follower.progress, distance) {
                    Ok((progress, leftover)) => {
                        overshoot_progress(&query, progress, leftover, settings.resolution)
                    }
                    Err(err) => {
                        warn!(?entity, %err, "path follower could not advance");
                        continue;
                    }
                }
            } else {
                follower.progress + follower.speed * delta * follower.direction
            };
            handle_bounds(raw, follower.direction, follower.loop_mode, max)
        };

        follower.progress = progress;
        follower.direction = direction;

        if let Some(kind) = event {
            events.write(FollowerEvent { entity, kind });

            if kind == FollowerEventKind::Finished {
                follower.state = FollowerState::Finished;
            }
        }

        let rotation = match follower.orientation {
            FollowerOrientation::PathRotations => query.orientation_at(progress),
            FollowerOrientation::AlignToTangent { up } => {
                tangent_rotation(query.tangent_at(progress), up, direction)
            }
            FollowerOrientation::Keep => transform.rotation,
        };

        transform.translation = query.position_at(progress) + rotation * follower.offset;
        transform.rotation = rotation;
    }
}

/// Move `progress` toward a timed target for one frame.
/// Returns the new progress and whether the target was reached.
fn step_toward_target(
    target: &mut ProgressTarget,
    progress: f32,
    delta: f32,
    max: f32,
) -> (f32, bool) {
    let goal = target.target.clamp(0.0, max);
    let remaining = goal - progress;
    if remaining == 0.0 || target.duration <= 0.0 {
        return (goal, true);
    }

    // Fixed once so the move keeps a constant pace to the end.
    let rate = *target
        .rate
        .get_or_insert(remaining.abs() / target.duration);
    let step = rate * delta;
    if step >= remaining.abs() {
        (goal, true)
    } else {
        (progress + step.copysign(remaining), false)
    }
}

/// Turn a distance left over at an end of the path into progress past that end,
/// scaled by the world length of the end segment.
fn overshoot_progress<T: SplineTransform>(
    query: &SplineQuery<'_, T>,
    progress: f32,
    leftover: f32,
    resolution: usize,
) -> f32 {
    if leftover == 0.0 {
        return progress;
    }
    let max = query.max_progress();
    let index = if leftover > 0.0 { query.path().num_segments() - 1 } else { 0 };
    let length = query
        .world_segment(index)
        .map(|segment| segment.length_at_resolution(resolution))
        .unwrap_or(0.0);
    if length <= 0.0 {
        return progress;
    }
    (progress + leftover / length).clamp(-max, 2.0 * max)
}

/// Handle progress bounds based on loop mode.
/// Returns (new_progress, new_direction, optional_event).
pub(crate) fn handle_bounds(
    progress: f32,
    direction: f32,
    loop_mode: LoopMode,
    max: f32,
) -> (f32, f32, Option<FollowerEventKind>) {
    match loop_mode {
        LoopMode::Once => {
            if progress >= max {
                (max, direction, Some(FollowerEventKind::Finished))
            } else if progress <= 0.0 && direction < 0.0 {
                (0.0, direction, Some(FollowerEventKind::Finished))
            } else {
                (progress.max(0.0), direction, None)
            }
        }
        LoopMode::Loop => {
            if progress >= max || progress < 0.0 {
                (
                    progress.rem_euclid(max),
                    direction,
                    Some(FollowerEventKind::LoopCompleted),
                )
            } else {
                (progress, direction, None)
            }
        }
        LoopMode::PingPong => {
            if progress >= max {
                let overshoot = progress - max;
                ((max - overshoot).max(0.0), -1.0, Some(FollowerEventKind::ReachedEnd))
            } else if progress <= 0.0 && direction < 0.0 {
                ((-progress).min(max), 1.0, Some(FollowerEventKind::ReachedStart))
            } else {
                (progress.max(0.0), direction, None)
            }
        }
    }
}

/// Rotation pointing -Z along the tangent, reversed when travelling backwards.
fn tangent_rotation(tangent: Vec3, up: Vec3, direction: f32) -> Quat {
    let forward = if direction >= 0.0 { tangent } else { -tangent };
    if forward.length_squared() < 1e-8 {
        return Quat::IDENTITY;
    }
    Transform::IDENTITY.looking_to(forward, up).rotation
}
