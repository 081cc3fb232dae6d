pub mod config;
mod driver;
mod types;

pub use driver::{run_pipeline, run_pipeline_reported};
pub use types::{ProgressReporter, Stage};
