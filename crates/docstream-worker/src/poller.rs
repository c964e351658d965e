//! Processing-status poller: observes server-side OCR/AI processing for one
//! document at a fixed interval until a terminal state.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use docstream_core::models::{DocumentRecord, ProcessingProgress, ProcessingStatus};
use docstream_core::{DocumentCatalog, PollError, ProcessingObserver};

const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 10;

#[derive(Clone)]
pub struct PollerConfig {
    /// Floor between consecutive status requests for one document. Applies
    /// after every poll, successful or failed.
    pub interval: Duration,
    /// Consecutive transient failures after which a watch gives up. A
    /// successful poll resets the counter.
    pub max_consecutive_failures: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

/// Watches server-side processing of uploaded documents through a
/// `DocumentCatalog`. A watch is a plain future: dropping or cancelling it
/// is how an owning context tears the poller down.
pub struct ProcessingPoller {
    catalog: Arc<dyn DocumentCatalog>,
    config: PollerConfig,
}

impl ProcessingPoller {
    pub fn new(catalog: Arc<dyn DocumentCatalog>, config: PollerConfig) -> Self {
        Self { catalog, config }
    }

    /// Poll `document_id` until its status is terminal, forwarding every
    /// observed snapshot to `observer`. Returns the terminal snapshot; once
    /// it does, no further request is ever issued for this document. A
    /// terminal `error` status is an observation, not a watch failure.
    #[tracing::instrument(skip(self, observer, cancel))]
    pub async fn watch(
        &self,
        document_id: Uuid,
        observer: Arc<dyn ProcessingObserver>,
        cancel: &CancellationToken,
    ) -> Result<ProcessingProgress, PollError> {
        let mut consecutive_failures = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }

            match self.catalog.processing_status(document_id).await {
                Ok(progress) => {
                    consecutive_failures = 0;
                    observer.on_status(&progress);

                    if progress.status.is_terminal() {
                        tracing::info!(
                            document_id = %document_id,
                            status = %progress.status,
                            ocr_progress = progress.ocr_progress,
                            ai_progress = progress.ai_progress,
                            "Processing reached terminal state"
                        );
                        return Ok(progress);
                    }
                }
                Err(err) if err.is_transient() => {
                    consecutive_failures += 1;
                    if consecutive_failures >= self.config.max_consecutive_failures {
                        tracing::error!(
                            document_id = %document_id,
                            attempts = consecutive_failures,
                            error = %err,
                            "Giving up on status polling"
                        );
                        return Err(PollError::RetriesExhausted {
                            attempts: consecutive_failures,
                            last_error: err,
                        });
                    }
                    tracing::warn!(
                        document_id = %document_id,
                        error = %err,
                        consecutive_failures,
                        "Transient status poll failure, will retry"
                    );
                }
                Err(err) => return Err(PollError::Transport(err)),
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = sleep(self.config.interval) => {}
            }
        }
    }

    /// Watch to completion, then re-fetch the document so the caller gets a
    /// record carrying the OCR/AI results. A terminal `error` status becomes
    /// `PollError::ProcessingFailed`.
    pub async fn wait_for_document(
        &self,
        document_id: Uuid,
        observer: Arc<dyn ProcessingObserver>,
        cancel: &CancellationToken,
    ) -> Result<DocumentRecord, PollError> {
        let final_progress = self.watch(document_id, observer, cancel).await?;

        match final_progress.status {
            ProcessingStatus::Completed => {
                let record = self
                    .catalog
                    .document(document_id)
                    .await
                    .map_err(PollError::Transport)?;
                Ok(record)
            }
            _ => Err(PollError::ProcessingFailed {
                message: final_progress
                    .message
                    .unwrap_or_else(|| "processing failed".to_string()),
            }),
        }
    }
}
