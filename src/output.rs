//! Terminal rendering of upload state.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::common::{UploadSettings, UploadSnapshot, UploadStage};

pub const ANALYZING: &str = "Analyzing floor plan...";
pub const REDIRECTING: &str = "Redirecting...";

/// Drop-zone prompt, depending on sign-in state.
pub fn dropzone_prompt(signed_in: bool) -> &'static str {
    if signed_in {
        "Click to upload or drag and drop"
    } else {
        "Sign in or sign up with puter to upload"
    }
}

pub fn size_help(settings: &UploadSettings) -> String {
    format!("Maximum file size {}MB.", settings.max_file_size_mb)
}

pub fn status_text(snapshot: &UploadSnapshot) -> &'static str {
    if snapshot.is_complete() {
        REDIRECTING
    } else {
        ANALYZING
    }
}

/// What became of a file right after it was handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Started,
    /// Signed out, so the uploader ignored it.
    Ignored,
    Failed(String),
}

pub fn selection(snapshot: &UploadSnapshot) -> Selection {
    if snapshot.stage == UploadStage::Failed {
        let reason = snapshot
            .failure
            .clone()
            .unwrap_or_else(|| "read failed".to_string());
        Selection::Failed(reason)
    } else if snapshot.has_file() {
        Selection::Started
    } else {
        Selection::Ignored
    }
}

pub fn progress_bar(file_name: &str) -> ProgressBar {
    let pb = ProgressBar::new(100);
    let bar_style = ProgressStyle::with_template("{prefix:.bold} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(bar_style);
    pb.set_prefix(file_name.to_string());
    pb.set_message(ANALYZING);
    pb
}

pub fn render(pb: &ProgressBar, snapshot: &UploadSnapshot) {
    pb.set_position(u64::from(snapshot.progress));
    pb.set_message(status_text(snapshot));
}

pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_with_message(format!("{} {}", style("✓").green().bold(), msg));
}

pub fn finish_error(pb: &ProgressBar, msg: &str) {
    pb.abandon_with_message(format!("{} {}", style("✗").red().bold(), msg));
}
