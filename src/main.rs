//! Headless demo: builds a closed path, sends a follower around it and
//! reports the background markers.
//!
//! Run with: `cargo run`

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use bevy_bezier_path::prelude::*;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 30.0,
            ))),
        )
        .add_plugins((LogPlugin::default(), TransformPlugin))
        .add_plugins((SplinePlugin, SplineFollowPlugin, SplineMarkersPlugin))
        .add_systems(Startup, setup)
        .add_systems(Update, (report_markers, report_followers, stop_after_a_while))
        .run();
}

fn setup(mut commands: Commands, settings: Res<SamplingSettings>) {
    let mut path = BezierPath::new();
    path.add_segment(Vec3::new(2.0, 1.5, 0.0), Quat::from_rotation_z(0.5));
    path.add_segment(Vec3::new(0.0, 3.0, 0.0), Quat::from_rotation_z(1.0));
    path.toggle_closed();
    path.create_checkpoint();

    let resolutions = vec![settings.resolution; path.num_segments()];
    match path.length_with_resolutions(&resolutions) {
        Ok(length) => info!(segments = path.num_segments(), length, "spawning path"),
        Err(err) => warn!(%err, "could not measure path"),
    }

    let path = commands
        .spawn((
            path,
            Transform::from_xyz(0.0, 0.0, -2.0),
            PathMarkers::with_spacing(0.25),
        ))
        .id();

    commands.spawn((
        Transform::default(),
        PathFollower::new(path)
            .with_speed(1.5)
            .with_loop_mode(LoopMode::Loop)
            .with_orientation(FollowerOrientation::AlignToTangent { up: Vec3::Z }),
    ));
}

fn report_markers(markers: Query<&MarkerPoints, Changed<MarkerPoints>>) {
    for markers in &markers {
        if markers.generation > 0 {
            info!(
                generation = markers.generation,
                count = markers.points.len(),
                "markers ready"
            );
        }
    }
}

fn report_followers(
    mut events: MessageReader<FollowerEvent>,
    followers: Query<(&PathFollower, &Transform)>,
) {
    for event in events.read() {
        if let Ok((follower, transform)) = followers.get(event.entity) {
            info!(
                kind = ?event.kind,
                progress = follower.progress,
                position = %transform.translation,
                "follower event"
            );
        }
    }
}

fn stop_after_a_while(time: Res<Time>, mut exit: MessageWriter<AppExit>) {
    if time.elapsed_secs() > 10.0 {
        exit.write(AppExit::Success);
    }
}
