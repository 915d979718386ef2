//! Error kinds for a single upload attempt.

use thiserror::Error;

/// Terminal outcome of one ingest attempt.
///
/// None of these ever reaches the completion callback. Unauthenticated
/// attempts are not represented: they are silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("{name} is {size} bytes, over the {limit} byte limit")]
    OversizeFile { name: String, size: u64, limit: u64 },

    #[error("failed to read {name}: {reason}")]
    ReadFailure { name: String, reason: String },

    #[error("an upload is already in progress")]
    UploadInProgress,

    #[error("the uploader has been shut down")]
    UploaderClosed,
}

impl IngestError {
    pub fn read_failure(name: impl Into<String>, err: &anyhow::Error) -> Self {
        IngestError::ReadFailure {
            name: name.into(),
            reason: format!("{err:#}"),
        }
    }
}
