#![allow(dead_code)]

pub mod config_test_utils;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use roomify::auth::{AuthContext, Identity, LocalAuth};
use roomify::common::UploadSettings;
use roomify::ingest::{EncodedPayload, FileHandle, PayloadReader, Uploader};
use std::sync::{Arc, Mutex};

pub const MIB: usize = 1024 * 1024;

pub fn signed_in() -> Arc<dyn AuthContext> {
    Arc::new(LocalAuth::signed_in(Identity::named("tester")))
}

pub fn signed_out() -> Arc<dyn AuthContext> {
    Arc::new(LocalAuth::anonymous())
}

pub fn settings(step: u8, interval_ms: u64, redirect_delay_ms: u64) -> UploadSettings {
    UploadSettings {
        progress_step: step,
        progress_interval_ms: interval_ms,
        redirect_delay_ms,
        ..UploadSettings::default()
    }
}

pub fn png(size: usize) -> FileHandle {
    FileHandle::from_bytes("plan.png", vec![0x5a; size])
}

/// Every payload the completion callback received, in order.
#[derive(Clone, Default)]
pub struct Completions(Arc<Mutex<Vec<EncodedPayload>>>);

impl Completions {
    pub fn handler(&self) -> impl FnOnce(EncodedPayload) + Send + 'static {
        let seen = self.0.clone();
        move |payload| seen.lock().expect("completions lock").push(payload)
    }

    pub fn count(&self) -> usize {
        self.0.lock().expect("completions lock").len()
    }

    pub fn first(&self) -> Option<EncodedPayload> {
        self.0.lock().expect("completions lock").first().cloned()
    }
}

pub fn uploader(auth: Arc<dyn AuthContext>, settings: UploadSettings) -> (Uploader, Completions) {
    let completions = Completions::default();
    let uploader = Uploader::new(auth, settings, completions.handler());
    (uploader, completions)
}

/// Reader whose read always fails.
pub struct FailingReader;

#[async_trait]
impl PayloadReader for FailingReader {
    async fn read(&self, _file: &FileHandle) -> Result<Bytes> {
        anyhow::bail!("simulated read failure")
    }
}

/// Reader that fails after a delay, so the failure lands mid-flight.
pub struct SlowFailingReader(pub std::time::Duration);

#[async_trait]
impl PayloadReader for SlowFailingReader {
    async fn read(&self, _file: &FileHandle) -> Result<Bytes> {
        tokio::time::sleep(self.0).await;
        anyhow::bail!("connection to storage lost")
    }
}

/// Reader that never resolves.
pub struct StalledReader;

#[async_trait]
impl PayloadReader for StalledReader {
    async fn read(&self, _file: &FileHandle) -> Result<Bytes> {
        std::future::pending().await
    }
}
