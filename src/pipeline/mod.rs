//! Pipeline configuration and execution.
//!
//! ## Submodules
//!
//! - [`spec`]: `PipelineConfig` and runtime threading controls
//! - [`runner`]: stage orchestration and the run state machine
//! - [`observer`]: logging, profiling and debug hooks

pub mod observer;
pub mod runner;
pub mod spec;

pub use observer::{NoopObserver, PipelineObserver, StageClock, StageReport, StageTimingObserver};
pub use runner::{Pipeline, RunState};
pub use spec::{PipelineConfig, RuntimeSpec};
