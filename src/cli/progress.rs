//! Progress display for comparison runs.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::icons::{arrow, success, warning};
use crate::services::ComparisonEvent;

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
}

/// Drive a progress bar from comparison events until the sender is dropped.
///
/// With `quiet` set, events are drained without drawing anything.
pub fn spawn_progress(
    mut event_rx: mpsc::Receiver<ComparisonEvent>,
    quiet: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut pb: Option<ProgressBar> = None;
        let mut failed = 0;

        while let Some(event) = event_rx.recv().await {
            if quiet {
                continue;
            }
            match event {
                ComparisonEvent::Started { files, terms } => {
                    eprintln!(
                        "{} Comparing {} terms across {} files",
                        arrow(),
                        terms,
                        files
                    );
                    let progress = ProgressBar::new(files as u64);
                    progress.set_style(bar_style());
                    progress.set_message("Scanning...");
                    pb = Some(progress);
                }
                ComparisonEvent::FileStarted { name, .. } => {
                    if let Some(ref progress) = pb {
                        progress.set_message(name);
                    }
                }
                ComparisonEvent::FileCompleted { .. } => {
                    if let Some(ref progress) = pb {
                        progress.inc(1);
                    }
                }
                ComparisonEvent::FileFailed { file_id, error } => {
                    failed += 1;
                    if let Some(ref progress) = pb {
                        progress.println(format!("{} {}: {}", warning(), file_id, error));
                        progress.inc(1);
                    }
                }
                ComparisonEvent::Finished {
                    files,
                    cells,
                    found,
                } => {
                    if let Some(progress) = pb.take() {
                        progress.finish_and_clear();
                    }
                    eprintln!(
                        "{} Compared {} files: {} of {} cells found",
                        success(),
                        files,
                        style(found).green(),
                        cells
                    );
                    if failed > 0 {
                        eprintln!("  {} {} files failed", warning(), failed);
                    }
                }
            }
        }

        if let Some(progress) = pb {
            progress.finish_and_clear();
        }
    })
}
