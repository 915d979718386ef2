//! Upload-and-ingest state machine.
//!
//! Stages: `Idle -> Accepted -> Encoding -> Progressing -> AwaitingCompletion -> Done`,
//! with `Encoding -> Failed` on a read error. One background task per
//! accepted file drives encoding, ticks and the final delay; every handler
//! here is synchronous and only touches the session under a short lock.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::common::{IngestError, UploadSettings, UploadSnapshot, UploadStage};

use super::acquire::{accept_drop, DragEvent, PickerEvent};
use super::encode::{encode_file, EncodedPayload, HandleReader, PayloadReader};
use super::file_handle::FileHandle;
use super::session::UploadSession;
use super::timer::{delay, CancelHandle, Ticker};

/// Receives the payload once progress has finished.
pub type CompletionHandler = Box<dyn FnOnce(EncodedPayload) + Send + 'static>;

struct Shared {
    session: Mutex<UploadSession>,
    snapshots: watch::Sender<UploadSnapshot>,
    on_complete: Mutex<Option<CompletionHandler>>,
}

impl Shared {
    /// Mutate the session and publish the resulting snapshot if it changed.
    fn update<R>(&self, f: impl FnOnce(&mut UploadSession) -> R) -> R {
        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Upload session lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        let result = f(&mut session);
        let next = session.snapshot();
        drop(session);

        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        result
    }

    fn take_handler(&self) -> Option<CompletionHandler> {
        match self.on_complete.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => {
                error!("Completion handler lock poisoned, recovering");
                poisoned.into_inner().take()
            }
        }
    }
}

/// One upload component. Dropping it cancels any pending read, tick or
/// delayed completion.
pub struct Uploader {
    auth: Arc<dyn AuthContext>,
    settings: UploadSettings,
    reader: Arc<dyn PayloadReader>,
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

impl Uploader {
    pub fn new<F>(auth: Arc<dyn AuthContext>, settings: UploadSettings, on_complete: F) -> Self
    where
        F: FnOnce(EncodedPayload) + Send + 'static,
    {
        let (snapshots, _) = watch::channel(UploadSnapshot::default());
        Self {
            auth,
            settings,
            reader: Arc::new(HandleReader),
            shared: Arc::new(Shared {
                session: Mutex::new(UploadSession::default()),
                snapshots,
                on_complete: Mutex::new(Some(Box::new(on_complete))),
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the byte source used during encoding.
    pub fn with_reader(mut self, reader: Arc<dyn PayloadReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    pub fn is_signed_in(&self) -> bool {
        self.auth.is_signed_in()
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Handle the owner keeps to tear down timers without dropping the uploader.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(self.cancel.clone())
    }

    //-- Input acquisition

    pub fn select_via_picker(&self, event: PickerEvent) -> Result<(), IngestError> {
        if !self.auth.is_signed_in() {
            debug!("Picker selection ignored: not signed in");
            return Ok(());
        }
        match event.first() {
            Some(file) => self.process_file(file.clone()),
            None => Ok(()),
        }
    }

    pub fn on_drag_over(&self, event: &mut DragEvent) {
        event.prevent_default();
        if !self.auth.is_signed_in() {
            return;
        }
        // No drop zone once a file is selected.
        self.shared.update(|s| {
            if !s.stage.is_busy() {
                s.is_dragging = true;
            }
        });
    }

    pub fn on_drag_leave(&self) {
        self.shared.update(|s| s.is_dragging = false);
    }

    pub fn on_drop(&self, mut event: DragEvent) -> Result<(), IngestError> {
        let dropped = accept_drop(&mut event);
        if !self.auth.is_signed_in() {
            debug!("Drop ignored: not signed in");
            return Ok(());
        }
        self.shared.update(|s| s.is_dragging = false);

        match dropped {
            Some(file) => self.process_file(file),
            None => Ok(()),
        }
    }

    //-- Validation and encoding

    /// Validate `file`, take ownership of it and start encoding in the
    /// background. Must be called from within a tokio runtime.
    ///
    /// The read has no timeout: a read that never resolves leaves the
    /// uploader in `Encoding` until it is cancelled.
    pub fn process_file(&self, file: FileHandle) -> Result<(), IngestError> {
        if !self.auth.is_signed_in() {
            debug!(file = file.name(), "File ignored: not signed in");
            return Ok(());
        }
        if self.cancel.is_cancelled() {
            warn!(file = file.name(), "File rejected: uploader was shut down");
            return Err(IngestError::UploaderClosed);
        }

        let limit = self.settings.max_bytes();
        if file.size() > limit {
            let err = IngestError::OversizeFile {
                name: file.name().to_string(),
                size: file.size(),
                limit,
            };
            error!(
                "File exceeds {}MB limit: {}",
                self.settings.max_file_size_mb, err
            );
            return Err(err);
        }

        let accepted = self.shared.update(|s| {
            if s.stage.is_busy() {
                return false;
            }
            s.accept(file.clone());
            true
        });
        if !accepted {
            warn!(file = file.name(), "File rejected: an upload is already in progress");
            return Err(IngestError::UploadInProgress);
        }

        let upload_id = Uuid::new_v4();
        info!(%upload_id, file = file.name(), size = file.size(), "File accepted");
        self.shared.update(|s| s.stage = UploadStage::Encoding);

        let span = tracing::info_span!("upload", id = %upload_id, file = file.name());
        tokio::spawn(
            run_upload(
                self.shared.clone(),
                self.reader.clone(),
                file,
                self.settings.clone(),
                self.cancel.child_token(),
            )
            .instrument(span),
        );

        Ok(())
    }
}

impl Drop for Uploader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Encode, tick to 100, wait, then hand the payload over.
async fn run_upload(
    shared: Arc<Shared>,
    reader: Arc<dyn PayloadReader>,
    file: FileHandle,
    settings: UploadSettings,
    token: CancellationToken,
) {
    let encoded = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Cancelled while encoding");
            return;
        }
        result = encode_file(reader.as_ref(), &file) => result,
    };

    let payload = match encoded {
        Ok(payload) => payload,
        Err(err) => {
            let failure = IngestError::read_failure(file.name(), &err);
            error!("Failed to read file: {failure}");
            shared.update(|s| s.reset_after_failure(failure.to_string()));
            return;
        }
    };
    debug!(
        bytes = payload.len(),
        expected_ticks = settings.ticks_to_complete(),
        "Encoding finished"
    );
    shared.update(|s| s.stage = UploadStage::Progressing);

    let mut ticker = Ticker::new(settings.progress_interval(), token.clone());
    loop {
        let Some(tick) = ticker.tick().await else {
            debug!("Cancelled while progressing");
            return;
        };
        let reached = shared.update(|s| s.advance(settings.progress_step));
        tracing::trace!(tick, "Progress tick");
        if reached {
            break;
        }
    }
    let ticks = ticker.stop();

    shared.update(|s| s.stage = UploadStage::AwaitingCompletion);
    if !delay(settings.redirect_delay(), &token).await {
        debug!("Cancelled before completion");
        return;
    }

    shared.update(|s| s.stage = UploadStage::Done);
    match shared.take_handler() {
        Some(handler) => {
            info!(ticks, "Upload complete, handing off payload");
            handler(payload);
        }
        None => warn!("Completion handler already consumed"),
    }
}
