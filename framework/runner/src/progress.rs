use std::cmp::min;
use std::time::{Duration, Instant};

use gust_core::prelude::DelegatedShutdownListener;
use indicatif::{ProgressBar, ProgressStyle};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Displays a wall-clock progress bar for the planned runtime of the whole run.
///
/// The bar is advisory. Scenarios own their timing, the bar just tracks elapsed seconds
/// against the longest planned scenario and disappears when the run shuts down.
pub(crate) fn start_progress(
    planned_runtime: Duration,
    mut shutdown_listener: DelegatedShutdownListener,
) {
    let planned_secs = planned_runtime.as_secs().max(1);

    std::thread::Builder::new()
        .name("progress".to_string())
        .spawn(move || {
            let started = Instant::now();
            let pb = ProgressBar::new(planned_secs);
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}s of {len}s ({percent}%)",
                )
                .expect("Failed to set progress style")
                .progress_chars("=> "),
            );

            while !shutdown_listener.should_shutdown() {
                pb.set_position(min(started.elapsed().as_secs(), planned_secs));
                std::thread::sleep(POLL_INTERVAL);
            }

            log::trace!("Progress thread shutting down");
            pb.finish_and_clear();
        })
        .expect("Failed to start progress thread");
}
