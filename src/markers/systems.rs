use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool};

use crate::spline::{BezierPath, SamplingSettings};

use super::{JobOutcome, MarkerPoints, MarkerTask, PathMarkers};

/// Start a new sampling job for every path whose geometry, marker options or
/// the shared sampling settings changed. Any job still running for that path
/// is cancelled.
pub fn request_marker_updates(
    mut paths: Query<(Entity, Ref<BezierPath>, Ref<PathMarkers>, &mut MarkerTask)>,
    settings: Res<SamplingSettings>,
) {
    if let Err(err) = settings.validate() {
        if settings.is_changed() {
            warn!(%err, "invalid sampling settings, markers not updated");
        }
        return;
    }

    let pool = AsyncComputeTaskPool::get();

    for (entity, path, markers, mut task) in &mut paths {
        if !(path.is_changed() || markers.is_changed() || settings.is_changed()) {
            continue;
        }
        if !markers.enabled {
            task.sampler.cancel();
            task.task = None;
            continue;
        }

        let spacing = markers.spacing.unwrap_or(settings.segment_length);
        let job = match task.sampler.request(&path, spacing, settings.res_per_meter) {
            Ok(job) => job,
            Err(err) => {
                warn!(?entity, %err, "skipping marker update");
                continue;
            }
        };

        debug!(?entity, generation = job.generation(), spacing, "marker job queued");
        // Replacing the handle drops the previous task, which cancels it.
        task.task = Some(pool.spawn(async move { job.run() }));
    }
}

/// Poll running jobs and copy the newest published batch into [`MarkerPoints`].
pub fn collect_marker_results(mut paths: Query<(Entity, &mut MarkerTask, &mut MarkerPoints)>) {
    for (entity, mut task, mut markers) in &mut paths {
        let Some(running) = task.task.as_mut() else {
            continue;
        };
        let Some(outcome) = block_on(future::poll_once(running)) else {
            continue;
        };
        task.task = None;

        match outcome {
            JobOutcome::Completed { generation, count } => {
                debug!(?entity, generation, count, "marker job completed");
            }
            JobOutcome::Cancelled { generation } => {
                debug!(?entity, generation, "marker job cancelled");
            }
            JobOutcome::Failed { generation, error } => {
                warn!(?entity, generation, %error, "marker job failed");
            }
        }

        if let Some(batch) = task.sampler.take_latest() {
            markers.points = batch.points;
            markers.generation = batch.generation;
        }
    }
}
