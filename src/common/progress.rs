/// Stage of the upload state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadStage {
    #[default]
    Idle,
    Accepted,
    Encoding,
    Progressing,
    AwaitingCompletion,
    Done,
    Failed,
}

impl UploadStage {
    /// True while a selected file owns the uploader. Only a failed read
    /// hands it back.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            UploadStage::Accepted
                | UploadStage::Encoding
                | UploadStage::Progressing
                | UploadStage::AwaitingCompletion
                | UploadStage::Done
        )
    }
}

/// Read-only view of an upload session for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadSnapshot {
    pub stage: UploadStage,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub is_dragging: bool,
    /// Clamped to 100.
    pub progress: u8,
    /// Message of the last read failure, cleared on the next acceptance.
    pub failure: Option<String>,
}

impl UploadSnapshot {
    pub fn has_file(&self) -> bool {
        self.file_name.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}
