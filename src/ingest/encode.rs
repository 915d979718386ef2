//! File content to data URI.

use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use bytes::Bytes;

use super::file_handle::FileHandle;

const DEFAULT_MIME: &str = "application/octet-stream";

/// Source of file bytes for the encoder. Swappable so hosts and tests can
/// control how (and whether) a read completes.
#[async_trait]
pub trait PayloadReader: Send + Sync + 'static {
    async fn read(&self, file: &FileHandle) -> Result<Bytes>;
}

/// Reads through [`FileHandle::read_all`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HandleReader;

#[async_trait]
impl PayloadReader for HandleReader {
    async fn read(&self, file: &FileHandle) -> Result<Bytes> {
        file.read_all().await
    }
}

/// A self-contained `data:` URI holding a file's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Media type between `data:` and `;base64`.
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
            .unwrap_or(DEFAULT_MIME)
    }

    /// Decode back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let (_, data) = self
            .0
            .split_once(";base64,")
            .ok_or_else(|| anyhow::anyhow!("payload is not a base64 data URI"))?;
        Ok(general_purpose::STANDARD.decode(data)?)
    }
}

/// Media type from the file name. Unknown kinds fall back to octet-stream,
/// which is what a browser reports for untyped files.
pub fn mime_for(file: &FileHandle) -> &'static str {
    match file.extension().as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => DEFAULT_MIME,
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> EncodedPayload {
    EncodedPayload(format!(
        "data:{mime};base64,{}",
        general_purpose::STANDARD.encode(bytes)
    ))
}

/// Read the file through `reader` and encode it.
pub async fn encode_file(reader: &dyn PayloadReader, file: &FileHandle) -> Result<EncodedPayload> {
    let bytes = reader.read(file).await?;
    Ok(encode_data_uri(mime_for(file), &bytes))
}
