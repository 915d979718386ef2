pub mod config;
pub mod errors;
pub mod progress;

pub use config::{AppConfig, ConfigOverrides, UploadSettings};
pub use errors::IngestError;
pub use progress::{UploadSnapshot, UploadStage};
