//! Per-phase timings and counters for one pipeline run

use std::time::{Duration, Instant};

/// Pipeline phases in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Listing,
    Load,
    Auxiliary,
    Dedup,
    Sort,
    Aggregate,
    Output,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Listing,
        Phase::Load,
        Phase::Auxiliary,
        Phase::Dedup,
        Phase::Sort,
        Phase::Aggregate,
        Phase::Output,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Listing => "listing",
            Phase::Load => "load",
            Phase::Auxiliary => "auxiliary",
            Phase::Dedup => "dedup",
            Phase::Sort => "sort",
            Phase::Aggregate => "aggregate",
            Phase::Output => "output",
        }
    }
}

/// Statistics for a whole run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub files_listed: usize,
    pub files_read: usize,
    pub files_failed: usize,
    pub records_loaded: usize,
    pub unique_records: usize,
    pub duplicates: usize,
    pub batches_claimed: usize,
    /// Parallel tasks that panicked, across every phase
    pub tasks_failed: usize,
    pub outputs_written: usize,
    pub outputs_failed: usize,
    pub sort_fallback: bool,
    timings: Vec<(Phase, Duration)>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, charging its wall time to `phase`
    pub fn time<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(phase, start.elapsed());
        out
    }

    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        match self.timings.iter_mut().find(|(p, _)| *p == phase) {
            Some((_, total)) => *total += elapsed,
            None => self.timings.push((phase, elapsed)),
        }
    }

    /// Time spent in `phase`, zero if it never ran
    pub fn duration(&self, phase: Phase) -> Duration {
        self.timings
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, d)| *d)
            .unwrap_or(Duration::ZERO)
    }

    pub fn total_time(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }
}
