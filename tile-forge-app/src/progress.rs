// tile-forge-app/src/progress.rs

use crate::config::ProgressLogLevel;
use std::time::{Duration, Instant};
use wfc_core::Statistics;

/// Snapshot of a running multi-pass solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressInfo {
    /// Zero-based index of the pass being solved.
    pub pass: usize,
    pub pass_count: usize,
    pub pass_name: String,
    pub statistics: Statistics,
}

impl ProgressInfo {
    /// Share of the pass's live cells that hold a tile, in percent.
    pub fn percentage(&self) -> f64 {
        if self.statistics.live_cells == 0 {
            100.0
        } else {
            self.statistics.collapsed_cells as f64 / self.statistics.live_cells as f64 * 100.0
        }
    }
}

/// Trait for reporting the progress of the generator.
///
/// Implementors of this trait can display progress information in various ways
/// (e.g., console output, GUI updates).
pub trait ProgressReporter {
    /// Called after every step with the latest statistics.
    fn report(&mut self, info: &ProgressInfo);

    /// Called when every pass completed.
    fn finish(&mut self, info: &ProgressInfo);

    /// Called when a pass ran out of fallback attempts.
    fn fail(&mut self, info: &ProgressInfo);
}

/// A `ProgressReporter` that writes throttled status lines to the log.
pub struct ConsoleProgressReporter {
    start_time: Instant,
    last_report_time: Instant,
    report_interval: Duration,
    level: ProgressLogLevel,
}

impl ConsoleProgressReporter {
    /// Creates a reporter that logs at most once per `report_interval`.
    pub fn new(report_interval: Duration, level: ProgressLogLevel) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_report_time: now,
            report_interval,
            level,
        }
    }

    fn emit(&self, message: &str) {
        match self.level {
            ProgressLogLevel::Trace => log::trace!("{}", message),
            ProgressLogLevel::Debug => log::debug!("{}", message),
            ProgressLogLevel::Info => log::info!("{}", message),
            ProgressLogLevel::Warn => log::warn!("{}", message),
        }
    }

    fn elapsed(&self) -> humantime::FormattedDuration {
        // Millisecond precision is plenty for a status line.
        let elapsed = self.start_time.elapsed();
        humantime::format_duration(Duration::from_millis(
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        ))
    }
}

/// Formats one status line.
pub fn format_progress(info: &ProgressInfo) -> String {
    format!(
        "Pass {}/{} '{}': {}/{} cells ({:.1}%) | steps {} | rollbacks {}",
        info.pass + 1,
        info.pass_count,
        info.pass_name,
        info.statistics.collapsed_cells,
        info.statistics.live_cells,
        info.percentage(),
        info.statistics.steps,
        info.statistics.rollbacks
    )
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, info: &ProgressInfo) {
        let now = Instant::now();
        if now.duration_since(self.last_report_time) >= self.report_interval {
            self.emit(&format!("{} | elapsed {}", format_progress(info), self.elapsed()));
            self.last_report_time = now;
        }
    }

    fn finish(&mut self, info: &ProgressInfo) {
        self.emit(&format!(
            "Generation finished after {} ({} passes)",
            self.elapsed(),
            info.pass_count
        ));
    }

    fn fail(&mut self, info: &ProgressInfo) {
        log::error!(
            "Generation failed after {}: {}",
            self.elapsed(),
            format_progress(info)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(collapsed: usize, live: usize) -> ProgressInfo {
        ProgressInfo {
            pass: 1,
            pass_count: 3,
            pass_name: "decor".to_owned(),
            statistics: Statistics {
                collapsed_cells: collapsed,
                live_cells: live,
                steps: 12,
                rollbacks: 2,
                ..Statistics::default()
            },
        }
    }

    #[test]
    fn test_percentage_of_live_cells() {
        assert!((info(5, 20).percentage() - 25.0).abs() < f64::EPSILON);
        assert!((info(0, 0).percentage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_line() {
        let line = format_progress(&info(5, 20));
        assert_eq!(
            line,
            "Pass 2/3 'decor': 5/20 cells (25.0%) | steps 12 | rollbacks 2"
        );
    }
}
