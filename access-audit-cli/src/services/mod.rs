// Business logic services layer
//
// This module contains the reconciliation core and the pipeline that feeds
// it. Sources are injected through the traits in `sources`, so the same
// pipeline serves the CLI commands and the tests.

pub mod pipeline;
pub mod reconcile;
pub mod sources;

pub use pipeline::{DatabaseFailurePolicy, PipelineOptions, RunOutcome, run_pipeline};
pub use sources::{AccountSource, DirectorySource};
