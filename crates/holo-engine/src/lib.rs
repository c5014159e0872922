pub mod io;
pub mod manifest;
pub mod plan;
pub mod runner;
pub mod spec;

pub use manifest::Manifest;
pub use plan::{Plan, ProcessedBatch, ProcessingStatistics, RecordFailure, StepStatistics};
pub use runner::{default_registry, extract_with, run_extract, run_pipeline};
pub use spec::PipelineSpec;
