/// Errors from batch-level operations.
///
/// Per-record problems never surface here: a record that cannot be used is
/// dropped and reported through the outcome's skipped list. This enum covers
/// the few failures that concern the batch as a whole.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read batch results file: {0}")]
    ResultsRead(std::io::Error),
}

pub type BatchResult<T> = std::result::Result<T, BatchError>;
