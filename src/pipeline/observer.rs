//! Stage hooks for logging, profiling and debugging.
//!
//! The runner calls a [`PipelineObserver`] at every stage boundary. All hook
//! methods have empty default bodies, so an observer implements only what it
//! needs and [`NoopObserver`] costs nothing.

use std::time::{Duration, Instant};

use crate::types::Sentence;

pub use crate::nlp::{STAGE_LEMMATIZE, STAGE_STOPWORDS, STAGE_TOKENIZE};

// ============================================================================
// Stage reports
// ============================================================================

/// Wall-clock timer for one stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a finished stage reports to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    elapsed: Duration,
    tokens: usize,
}

impl StageReport {
    pub fn new(elapsed: Duration, tokens: usize) -> Self {
        Self { elapsed, tokens }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in fractional milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Number of tokens the stage produced or annotated
    pub fn tokens(&self) -> usize {
        self.tokens
    }
}

// ============================================================================
// Observers
// ============================================================================

/// Hooks invoked by [`Pipeline`](super::Pipeline) around each stage
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// The sentences as they stand after `stage` finished
    fn on_sentences(&mut self, _stage: &'static str, _sentences: &[Sentence]) {}
}

/// Observer that ignores every hook
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records the report of every completed stage, in execution order
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Names of the stages that ran
    pub fn stages(&self) -> Vec<&'static str> {
        self.reports.iter().map(|(name, _)| *name).collect()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, *report));
    }
}
