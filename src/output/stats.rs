//! Run statistics and their console rendering

use crate::miner::{Failure, FailureReason};
use crate::state::RunPhase;
use std::time::Duration;

/// Completions between two progress lines
pub const PROGRESS_INTERVAL: usize = 25;

const BAR_LENGTH: usize = 50;

/// Aggregate outcome of one extraction run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifiers in the catalog
    pub total: usize,

    /// Tasks that reported back, whatever the outcome
    pub completed: usize,

    /// Rows written to the output file
    pub succeeded: usize,

    /// Per-item failures, in completion order
    pub failures: Vec<Failure>,

    /// Whether an interrupt stopped the run early
    pub interrupted: bool,

    /// Phase the run ended in
    pub phase: RunPhase,

    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failures: Vec::new(),
            interrupted: false,
            phase: RunPhase::Idle,
            elapsed: Duration::ZERO,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Counts one finished task; returns true when a progress line is due
    pub fn record_success(&mut self) -> bool {
        self.succeeded += 1;
        self.tick()
    }

    /// Counts one failed task; returns true when a progress line is due
    pub fn record_failure(&mut self, failure: Failure) -> bool {
        self.failures.push(failure);
        self.tick()
    }

    fn tick(&mut self) -> bool {
        self.completed += 1;
        self.completed % PROGRESS_INTERVAL == 0 || self.completed == self.total
    }

    /// Failures of each kind: (http status, malformed, unexpected)
    pub fn failure_breakdown(&self) -> (usize, usize, usize) {
        self.failures
            .iter()
            .fold((0, 0, 0), |(http, malformed, other), f| match f.reason {
                FailureReason::HttpStatus(_) => (http + 1, malformed, other),
                FailureReason::Malformed(_) => (http, malformed + 1, other),
                FailureReason::Unexpected(_) => (http, malformed, other + 1),
            })
    }
}

/// Renders `Progress: |████----| 50.0% (50/100)`
pub fn progress_line(current: usize, total: usize) -> String {
    if total == 0 {
        return format!("Progress: |{}| 100.0% (0/0)", "█".repeat(BAR_LENGTH));
    }

    let percent = current as f64 / total as f64 * 100.0;
    let filled = (BAR_LENGTH * current / total).min(BAR_LENGTH);
    format!(
        "Progress: |{}{}| {:.1}% ({}/{})",
        "█".repeat(filled),
        "-".repeat(BAR_LENGTH - filled),
        percent,
        current,
        total
    )
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Extraction Summary ===\n");

    println!("Overview:");
    println!("  Identifiers in catalog: {}", summary.total);
    println!("  Completed: {}", summary.completed);
    println!("  Rows written: {}", summary.succeeded);
    println!("  Failures: {}", summary.failed());
    println!("  Final phase: {}", summary.phase);
    if summary.interrupted {
        println!(
            "  Interrupted: {} identifiers were never extracted",
            summary.total.saturating_sub(summary.completed)
        );
    }
    println!();

    if !summary.failures.is_empty() {
        let (http, malformed, other) = summary.failure_breakdown();
        println!("Failure Summary:");
        println!("  HTTP status: {}", http);
        println!("  Malformed response: {}", malformed);
        println!("  Unexpected: {}", other);
        println!();

        println!("Failed Identifiers ({}):", summary.failed());
        for failure in &summary.failures {
            println!("  - {}: {}", failure.id, failure.reason);
        }
        println!();
    }

    let success_rate = if summary.completed > 0 {
        summary.succeeded as f64 / summary.completed as f64 * 100.0
    } else {
        0.0
    };
    println!(
        "Success Rate: {:.1}% ({} / {} identifiers extracted)",
        success_rate, summary.succeeded, summary.completed
    );
}
