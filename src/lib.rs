pub mod auth;
pub mod common;
pub mod handoff;
pub mod ingest;
pub mod output;

pub use auth::{AuthContext, Identity, LocalAuth};
pub use common::{AppConfig, IngestError, UploadSettings, UploadSnapshot, UploadStage};
pub use handoff::Handoff;
pub use ingest::{EncodedPayload, FileHandle, Uploader};
