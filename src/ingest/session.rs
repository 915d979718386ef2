use crate::common::{UploadSnapshot, UploadStage};

use super::file_handle::FileHandle;

/// Mutable state of one uploader. Owned by exactly one `Uploader`.
#[derive(Debug, Default)]
pub struct UploadSession {
    pub selected_file: Option<FileHandle>,
    pub is_dragging: bool,
    pub progress: u8,
    pub stage: UploadStage,
    pub failure: Option<String>,
}

impl UploadSession {
    /// Take ownership of `file` and restart progress from zero.
    pub fn accept(&mut self, file: FileHandle) {
        self.selected_file = Some(file);
        self.progress = 0;
        self.failure = None;
        self.stage = UploadStage::Accepted;
    }

    /// Add one step, clamped at 100. Returns true once 100 is reached.
    pub fn advance(&mut self, step: u8) -> bool {
        self.progress = self.progress.saturating_add(step).min(100);
        self.progress >= 100
    }

    /// Back to the empty state after a failed read.
    pub fn reset_after_failure(&mut self, message: String) {
        self.selected_file = None;
        self.progress = 0;
        self.stage = UploadStage::Failed;
        self.failure = Some(message);
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        UploadSnapshot {
            stage: self.stage,
            file_name: self.selected_file.as_ref().map(|f| f.name().to_string()),
            file_size: self.selected_file.as_ref().map(|f| f.size()),
            is_dragging: self.is_dragging,
            progress: self.progress,
            failure: self.failure.clone(),
        }
    }
}
