//! Document endpoints: multipart upload with streamed progress, processing
//! status, and the detail read used to refresh a record once processing
//! completes.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use docstream_core::models::{DocumentRecord, DocumentUpload, FilePayload, ProcessingProgress};
use docstream_core::{
    sanitize_filename, DocumentCatalog, DocumentTransport, ProgressSink, TransportError,
};

use crate::{ApiClient, API_PREFIX};

/// Upload bodies are streamed in 64 KiB chunks; one progress report is
/// emitted per chunk handed to the HTTP layer.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Document API bound to one `ApiClient`. Implements the core transport and
/// catalog traits so the queue and the poller stay HTTP-agnostic.
#[derive(Clone, Debug)]
pub struct DocumentsApi {
    client: ApiClient,
}

impl DocumentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Upload one file with its metadata. Progress percentages are reported
    /// as the multipart body streams out, non-decreasing by construction.
    #[tracing::instrument(skip(self, file, upload, progress, cancel), fields(filename = %file.name, size = file.size()))]
    pub async fn upload_document(
        &self,
        file: &FilePayload,
        upload: &DocumentUpload,
        progress: Arc<dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<DocumentRecord, TransportError> {
        let form = self.upload_form(file, upload, progress)?;
        let path = format!("{}/documents", API_PREFIX);

        let record: DocumentRecord = tokio::select! {
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            result = self.client.post_multipart(&path, form) => result?,
        };

        tracing::info!(
            document_id = %record.id,
            filename = %file.name,
            "Document upload accepted"
        );

        Ok(record)
    }

    fn upload_form(
        &self,
        file: &FilePayload,
        upload: &DocumentUpload,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Form, TransportError> {
        let total = file.size().max(1);
        let data = file.data.clone();
        let chunks: Vec<Bytes> = (0..data.len())
            .step_by(UPLOAD_CHUNK_SIZE)
            .map(|start| data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(data.len())))
            .collect();

        let mut sent = 0u64;
        let stream = tokio_stream::iter(chunks).map(move |chunk: Bytes| {
            sent += chunk.len() as u64;
            let percent = ((sent * 100) / total as u64).min(100) as u8;
            progress.on_progress(percent);
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), file.size() as u64)
            .file_name(sanitize_filename(&file.name))
            .mime_str(&file.content_type)
            .map_err(|e| {
                TransportError::InvalidRequest(format!(
                    "invalid content type '{}': {}",
                    file.content_type, e
                ))
            })?;

        let mut form = Form::new()
            .part("file", part)
            .text("title", upload.resolved_title(file))
            .text("category", upload.category.clone())
            .text("priority", upload.priority.as_i32().to_string());

        if let Some(description) = &upload.description {
            form = form.text("description", description.clone());
        }

        if !upload.tags.is_empty() {
            let tags = serde_json::to_string(&upload.tags)
                .map_err(|e| TransportError::InvalidRequest(format!("tags: {}", e)))?;
            form = form.text("tags", tags);
        }

        Ok(form)
    }

    pub async fn processing_status(
        &self,
        document_id: Uuid,
    ) -> Result<ProcessingProgress, TransportError> {
        self.client
            .get(&format!(
                "{}/documents/{}/processing-status",
                API_PREFIX, document_id
            ))
            .await
    }

    pub async fn get_document(&self, document_id: Uuid) -> Result<DocumentRecord, TransportError> {
        self.client
            .get(&format!("{}/documents/{}", API_PREFIX, document_id))
            .await
    }
}

#[async_trait]
impl DocumentTransport for DocumentsApi {
    async fn send(
        &self,
        file: &FilePayload,
        upload: &DocumentUpload,
        progress: Arc<dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<DocumentRecord, TransportError> {
        self.upload_document(file, upload, progress, cancel).await
    }
}

#[async_trait]
impl DocumentCatalog for DocumentsApi {
    async fn processing_status(
        &self,
        document_id: Uuid,
    ) -> Result<ProcessingProgress, TransportError> {
        DocumentsApi::processing_status(self, document_id).await
    }

    async fn document(&self, document_id: Uuid) -> Result<DocumentRecord, TransportError> {
        self.get_document(document_id).await
    }
}
