/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    Decoding,
    Despeckling,
    Deflickering,
    Encoding,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decoding => write!(f, "Decoding frames"),
            Self::Despeckling => write!(f, "Removing impulse noise"),
            Self::Deflickering => write!(f, "Removing temporal flicker"),
            Self::Encoding => write!(f, "Encoding output"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (frame count), if known.
    fn begin_stage(&self, _stage: Stage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
