//! Floor-plan intake: acquisition, validation, encoding and simulated progress.

pub mod acquire;
pub mod encode;
pub mod file_handle;
pub mod session;
pub mod timer;
pub mod uploader;

pub use acquire::{accept_drop, DragEvent, PickerEvent, PickerFilter};
pub use encode::{EncodedPayload, HandleReader, PayloadReader};
pub use file_handle::FileHandle;
pub use timer::CancelHandle;
pub use uploader::{CompletionHandler, Uploader};
