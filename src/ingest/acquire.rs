//! Picker and drag-and-drop boundary types.
//!
//! Environment side effects (suppressing the host's default drop handling)
//! happen here, once, so the uploader's decisions stay pure.

use crate::common::UploadSettings;

use super::file_handle::FileHandle;

/// Change event from a file picker.
#[derive(Debug, Clone, Default)]
pub struct PickerEvent {
    files: Vec<FileHandle>,
}

impl PickerEvent {
    pub fn new(files: Vec<FileHandle>) -> Self {
        Self { files }
    }

    pub fn single(file: FileHandle) -> Self {
        Self { files: vec![file] }
    }

    pub fn first(&self) -> Option<&FileHandle> {
        self.files.first()
    }
}

/// Drag-over or drop event from the drop target.
#[derive(Debug, Clone, Default)]
pub struct DragEvent {
    files: Vec<FileHandle>,
    default_prevented: bool,
}

impl DragEvent {
    pub fn new(files: Vec<FileHandle>) -> Self {
        Self {
            files,
            default_prevented: false,
        }
    }

    /// A hover without payload, as delivered during drag-over.
    pub fn hover() -> Self {
        Self::default()
    }

    /// Stop the host from navigating to the dropped file.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn take_first(&mut self) -> Option<FileHandle> {
        if self.files.is_empty() {
            None
        } else {
            Some(self.files.remove(0))
        }
    }
}

/// Suppress the default drop behavior and take the first dropped file.
pub fn accept_drop(raw: &mut DragEvent) -> Option<FileHandle> {
    raw.prevent_default();
    raw.take_first()
}

/// Extension filter the picker dialog offers. Drops bypass it.
#[derive(Debug, Clone)]
pub struct PickerFilter {
    extensions: Vec<String>,
}

impl PickerFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::new(&settings.accepted_extensions)
    }

    pub fn accepts(&self, file: &FileHandle) -> bool {
        file.extension()
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
    }

    /// Comma-separated list in `accept` attribute form, e.g. `.jpg,.jpeg,.png`.
    pub fn accept_attr(&self) -> String {
        self.extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}
