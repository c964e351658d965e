//! Trait seams between the lifecycle orchestration and the HTTP layer.
//!
//! The upload queue depends on `DocumentTransport`, the poller on
//! `DocumentCatalog`; `docstream-api-client` implements both against the
//! remote service, and tests substitute scripted fakes.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::TransportError;
use crate::hooks::ProgressSink;
use crate::models::{DocumentRecord, DocumentUpload, FilePayload, ProcessingProgress};

/// Performs one file's network transfer.
///
/// Assumes the file already passed validation (size cap, content-type
/// allow-list). Reports transfer progress through `progress` with
/// monotonically non-decreasing percentages. Does not retry; a failed send
/// surfaces as a single `TransportError` for the caller to handle.
#[async_trait]
pub trait DocumentTransport: Send + Sync {
    async fn send(
        &self,
        file: &FilePayload,
        upload: &DocumentUpload,
        progress: Arc<dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<DocumentRecord, TransportError>;
}

/// Read access to remote document state: the processing-status endpoint and
/// the document detail read used to refresh a record once processing
/// completes.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    async fn processing_status(
        &self,
        document_id: Uuid,
    ) -> Result<ProcessingProgress, TransportError>;

    async fn document(&self, document_id: Uuid) -> Result<DocumentRecord, TransportError>;
}
