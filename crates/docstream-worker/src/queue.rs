//! Upload queue: the ordered collection of entries for one upload session,
//! and the bounded-concurrency dispatch of pending entries to the transport.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use docstream_core::models::{DocumentUpload, FilePayload, UploadEntry, UploadStatus};
use docstream_core::{DocumentTransport, ProgressSink};

#[derive(Clone)]
pub struct UploadQueueConfig {
    /// Upper bound on simultaneous in-flight transfers per upload pass.
    pub max_concurrent_uploads: usize,
}

impl Default for UploadQueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent_uploads: 3,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("no entry at index {0}")]
    IndexOutOfBounds(usize),

    /// Removing an in-flight entry would orphan its transport task, so the
    /// operation is rejected rather than deferred.
    #[error("entry '{filename}' is uploading and cannot be removed")]
    EntryInFlight { filename: String },
}

/// Outcome of one `start_upload` pass.
#[derive(Debug, Default, Clone)]
pub struct UploadSummary {
    /// Entries that were pending when the pass began.
    pub attempted: usize,
    pub completed: usize,
    pub failed: usize,
    /// Remote ids of the accepted documents, ready for status polling.
    pub document_ids: Vec<Uuid>,
}

/// Per-session upload queue. Entries are mutated only through this type: by
/// its own operations while at rest, and by exactly one transport task while
/// an entry is `uploading`.
pub struct UploadQueue {
    entries: Arc<RwLock<Vec<UploadEntry>>>,
    transport: Arc<dyn DocumentTransport>,
    config: UploadQueueConfig,
}

impl UploadQueue {
    pub fn new(transport: Arc<dyn DocumentTransport>, config: UploadQueueConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            transport,
            config,
        }
    }

    /// Append one pending entry per file. Duplicate names are allowed; every
    /// selection creates an independent entry. Returns the new entry ids.
    pub fn add_files(&self, files: Vec<FilePayload>) -> Vec<Uuid> {
        let mut entries = self.entries.write();
        files
            .into_iter()
            .map(|file| {
                let entry = UploadEntry::new(file);
                let id = entry.id;
                tracing::debug!(entry_id = %id, filename = %entry.file.name, "File queued");
                entries.push(entry);
                id
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of the current entries, in queue order.
    pub fn entries(&self) -> Vec<UploadEntry> {
        self.entries.read().clone()
    }

    /// Remove the entry at `index`. Rejected while that entry is uploading.
    pub fn remove_file(&self, index: usize) -> Result<UploadEntry, QueueError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get(index)
            .ok_or(QueueError::IndexOutOfBounds(index))?;

        if entry.status == UploadStatus::Uploading {
            return Err(QueueError::EntryInFlight {
                filename: entry.file.name.clone(),
            });
        }

        Ok(entries.remove(index))
    }

    /// Best-effort clear: removes every entry that is not currently
    /// uploading and returns how many were removed. In-flight entries stay
    /// until their transfer settles.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.status == UploadStatus::Uploading);
        before - entries.len()
    }

    /// Flip every failed entry back to pending so the next upload pass picks
    /// it up. Returns how many entries were reset.
    pub fn reset_failed(&self) -> usize {
        let mut entries = self.entries.write();
        entries
            .iter_mut()
            .filter(|e| e.status == UploadStatus::Error)
            .filter_map(|e| e.reset().ok())
            .count()
    }

    /// Upload every pending entry, at most `max_concurrent_uploads` at a
    /// time. Entries are marked `uploading` before the first await, so a
    /// concurrent second call finds nothing pending. One entry's failure
    /// settles only that entry; the pass resolves once every dispatched
    /// transfer has settled.
    #[tracing::instrument(skip(self, upload, cancel))]
    pub async fn start_upload(
        &self,
        upload: &DocumentUpload,
        cancel: &CancellationToken,
    ) -> UploadSummary {
        let targets: Vec<(Uuid, FilePayload)> = {
            let mut entries = self.entries.write();
            entries
                .iter_mut()
                .filter(|e| e.status == UploadStatus::Pending)
                .filter_map(|e| e.begin_upload().ok().map(|_| (e.id, e.file.clone())))
                .collect()
        };

        if targets.is_empty() {
            tracing::debug!("No pending entries to upload");
            return UploadSummary::default();
        }

        tracing::info!(count = targets.len(), "Starting upload pass");

        let target_ids: Vec<Uuid> = targets.iter().map(|(id, _)| *id).collect();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_uploads));
        let mut handles = Vec::new();

        for (entry_id, file) in targets {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            let transport = Arc::clone(&self.transport);
            let entries = Arc::clone(&self.entries);
            let upload = upload.clone();
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let sink: Arc<dyn ProgressSink> = Arc::new(EntryProgressSink {
                    entries: Arc::clone(&entries),
                    entry_id,
                });

                let result = transport.send(&file, &upload, sink, &cancel).await;

                let mut guard = entries.write();
                let Some(entry) = guard.iter_mut().find(|e| e.id == entry_id) else {
                    return;
                };

                match result {
                    Ok(record) => {
                        if entry.complete(record.id).is_ok() {
                            tracing::info!(
                                entry_id = %entry_id,
                                document_id = %record.id,
                                filename = %entry.file.name,
                                "Upload completed"
                            );
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            entry_id = %entry_id,
                            filename = %entry.file.name,
                            error = %err,
                            "Upload failed"
                        );
                        let _ = entry.fail(err.to_string());
                    }
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Upload task panicked");
            }
        }

        self.summarize(&target_ids)
    }

    fn summarize(&self, target_ids: &[Uuid]) -> UploadSummary {
        let entries = self.entries.read();
        let mut summary = UploadSummary {
            attempted: target_ids.len(),
            ..UploadSummary::default()
        };

        for id in target_ids {
            if let Some(entry) = entries.iter().find(|e| e.id == *id) {
                match entry.status {
                    UploadStatus::Completed => {
                        summary.completed += 1;
                        if let Some(document_id) = entry.document_id {
                            summary.document_ids.push(document_id);
                        }
                    }
                    UploadStatus::Error => summary.failed += 1,
                    _ => {}
                }
            }
        }

        summary
    }
}

/// Routes one transfer's progress reports into its owning entry. Reports
/// arrive in order from the single transport task, and the entry clamps
/// progress non-decreasing.
struct EntryProgressSink {
    entries: Arc<RwLock<Vec<UploadEntry>>>,
    entry_id: Uuid,
}

impl ProgressSink for EntryProgressSink {
    fn on_progress(&self, percent: u8) {
        let mut guard = self.entries.write();
        if let Some(entry) = guard.iter_mut().find(|e| e.id == self.entry_id) {
            entry.set_progress(percent);
        }
    }
}
