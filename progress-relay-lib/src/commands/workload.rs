//! A simulated document job used by the `demo` command.
//!
//! The job knows nothing about monitors. It only asks the [`registry`] for
//! progress bars, the same way third-party processing code would, and so it
//! reports into whatever factory is active when it runs.

use crate::intercept::BarOptions;
use crate::registry;
use core::time::Duration;
use serde::Serialize;
use std::thread;

/// Log target for the simulated job
const LOG_TARGET: &str = "  workload";

const LAYOUT_DESCRIPTION: &str = "Layout detection";
const RECOGNITION_DESCRIPTION: &str = "Text recognition";

/// Parameters of one simulated job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSpec {
    pub pages: u64,

    /// Time spent on each page in each phase.
    pub page_delay: Duration,

    /// Page on which layout detection fails, if any.
    pub fail_at: Option<u64>,
}

/// What a successful job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobReport {
    pub pages_processed: u64,
    pub layout_blocks: u64,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("page {page} could not be analyzed")]
    PageFailed { page: u64 },
}

/// Run the job on the calling thread.
///
/// # Errors
///
/// Returns [`JobError::PageFailed`] when layout detection reaches `spec.fail_at`.
pub fn run_job(spec: JobSpec) -> Result<JobReport, JobError> {
    log::info!(target: LOG_TARGET, "Processing {} pages", spec.pages);

    let mut layout_blocks = 0;
    for page in registry::wrap_iter(1..=spec.pages, BarOptions::new().with_description(LAYOUT_DESCRIPTION)) {
        thread::sleep(spec.page_delay);
        if spec.fail_at == Some(page) {
            log::warn!(target: LOG_TARGET, "Layout detection failed on page {page}");
            return Err(JobError::PageFailed { page });
        }

        layout_blocks += blocks_on_page(page);
    }

    let bar = registry::new_bar(BarOptions::new().with_description(RECOGNITION_DESCRIPTION));
    bar.set_total(spec.pages);
    for _ in 0..spec.pages {
        thread::sleep(spec.page_delay);
        bar.advance(1);
    }
    bar.close();

    log::info!(target: LOG_TARGET, "Found {layout_blocks} layout blocks");

    Ok(JobReport {
        pages_processed: spec.pages,
        layout_blocks,
    })
}

const fn blocks_on_page(page: u64) -> u64 {
    page % 3 + 1
}
