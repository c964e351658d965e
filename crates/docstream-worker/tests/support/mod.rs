//! Scripted mock implementations of the core trait seams, so lifecycle
//! tests run without a network or an HTTP server.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use docstream_core::models::{
    DocumentRecord, DocumentUpload, FilePayload, ProcessingProgress, ProcessingStatus,
};
use docstream_core::{DocumentCatalog, DocumentTransport, ProgressSink, TransportError};

pub fn document_record(id: Uuid) -> DocumentRecord {
    DocumentRecord {
        id,
        filename: "report.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        file_size: 1024,
        title: "report".to_string(),
        description: None,
        category: "general".to_string(),
        priority: 2,
        tags: vec![],
        url: None,
        ocr_text: None,
        ai_summary: None,
        uploaded_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn progress(document_id: Uuid, status: ProcessingStatus, ocr: u8) -> ProcessingProgress {
    ProcessingProgress {
        document_id,
        ocr_progress: ocr,
        ai_progress: ocr,
        status,
        message: None,
    }
}

/// What `MockTransport` does when asked to send a given filename.
pub enum Behavior {
    /// Emit the progress events, then return a fresh document record.
    Succeed { events: Vec<u8> },
    /// Fail with an API error carrying this status and message.
    FailHttp { status: u16, message: String },
    /// Fail with a network error.
    FailNetwork(String),
    /// Park until `release` is notified (or the transfer is cancelled),
    /// then succeed. Lets tests observe an entry mid-upload.
    Block { release: Arc<Notify> },
}

/// Transport double scripted per filename.
pub struct MockTransport {
    behaviors: Mutex<HashMap<String, Behavior>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            behaviors: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_behavior(&self, filename: &str, behavior: Behavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(filename.to_string(), behavior);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentTransport for MockTransport {
    async fn send(
        &self,
        file: &FilePayload,
        _upload: &DocumentUpload,
        progress: Arc<dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<DocumentRecord, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let behavior = self.behaviors.lock().unwrap().remove(&file.name);
        match behavior {
            Some(Behavior::Succeed { events }) => {
                for percent in events {
                    progress.on_progress(percent);
                }
                Ok(document_record(Uuid::new_v4()))
            }
            Some(Behavior::FailHttp { status, message }) => {
                Err(TransportError::Api { status, message })
            }
            Some(Behavior::FailNetwork(message)) => Err(TransportError::Network(message)),
            Some(Behavior::Block { release }) => {
                tokio::select! {
                    _ = release.notified() => {
                        progress.on_progress(100);
                        Ok(document_record(Uuid::new_v4()))
                    }
                    _ = cancel.cancelled() => Err(TransportError::Cancelled),
                }
            }
            None => panic!("no scripted behavior for file '{}'", file.name),
        }
    }
}

/// Catalog double that replays a scripted sequence of status responses and
/// counts every request it receives.
pub struct ScriptedCatalog {
    statuses: Mutex<VecDeque<Result<ProcessingProgress, TransportError>>>,
    detail: Mutex<Option<DocumentRecord>>,
    status_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new(statuses: Vec<Result<ProcessingProgress, TransportError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            detail: Mutex::new(None),
            status_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_detail(self, record: DocumentRecord) -> Self {
        *self.detail.lock().unwrap() = Some(record);
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentCatalog for ScriptedCatalog {
    async fn processing_status(
        &self,
        document_id: Uuid,
    ) -> Result<ProcessingProgress, TransportError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected status poll for document {}", document_id))
    }

    async fn document(&self, document_id: Uuid) -> Result<DocumentRecord, TransportError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.detail
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Api {
                status: 404,
                message: format!("Document {} not found", document_id),
            })
    }
}

/// Observer that records every snapshot it is handed.
#[derive(Default)]
pub struct CollectingObserver {
    snapshots: Mutex<Vec<ProcessingProgress>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<ProcessingProgress> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl docstream_core::ProcessingObserver for CollectingObserver {
    fn on_status(&self, progress: &ProcessingProgress) {
        self.snapshots.lock().unwrap().push(progress.clone());
    }
}
