//! Client-side upload session models: the file payload and the per-file
//! lifecycle entry with its state machine.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// One file the user intends to send: name, MIME type, and the bytes.
/// Immutable once created; clones share the underlying buffer.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Filename without its extension, used as the default document title.
    pub fn stem(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Error,
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Pending => write!(f, "pending"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Completed => write!(f, "completed"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for UploadStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UploadStatus::Pending),
            "uploading" => Ok(UploadStatus::Uploading),
            "completed" => Ok(UploadStatus::Completed),
            "error" => Ok(UploadStatus::Error),
            _ => Err(anyhow::anyhow!("Invalid upload status: {}", s)),
        }
    }
}

/// Rejected entry state transition. The only legal paths are
/// `pending -> uploading -> {completed, error}` plus the explicit
/// `error -> pending` reset.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid upload state transition: {from} -> {to}")]
pub struct EntryStateError {
    pub from: UploadStatus,
    pub to: UploadStatus,
}

/// One queued file together with its lifecycle state.
///
/// `id` is a client-side identifier that stays stable across queue
/// reordering, so an in-flight transport task can address its entry after
/// siblings were removed.
#[derive(Debug, Clone)]
pub struct UploadEntry {
    pub id: Uuid,
    pub file: FilePayload,
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
    pub document_id: Option<Uuid>,
}

impl UploadEntry {
    pub fn new(file: FilePayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            progress: 0,
            status: UploadStatus::Pending,
            error: None,
            document_id: None,
        }
    }

    /// `pending -> uploading`.
    pub fn begin_upload(&mut self) -> Result<(), EntryStateError> {
        match self.status {
            UploadStatus::Pending => {
                self.status = UploadStatus::Uploading;
                Ok(())
            }
            from => Err(EntryStateError {
                from,
                to: UploadStatus::Uploading,
            }),
        }
    }

    /// Apply a transport progress report. Only meaningful while uploading;
    /// the stored value never decreases.
    pub fn set_progress(&mut self, percent: u8) {
        if self.status == UploadStatus::Uploading {
            self.progress = self.progress.max(percent.min(100));
        }
    }

    /// `uploading -> completed`; progress is forced to 100 and the remote
    /// document id recorded.
    pub fn complete(&mut self, document_id: Uuid) -> Result<(), EntryStateError> {
        match self.status {
            UploadStatus::Uploading => {
                self.status = UploadStatus::Completed;
                self.progress = 100;
                self.document_id = Some(document_id);
                self.error = None;
                Ok(())
            }
            from => Err(EntryStateError {
                from,
                to: UploadStatus::Completed,
            }),
        }
    }

    /// `uploading -> error`, recording the failure reason.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), EntryStateError> {
        match self.status {
            UploadStatus::Uploading => {
                self.status = UploadStatus::Error;
                self.error = Some(message.into());
                Ok(())
            }
            from => Err(EntryStateError {
                from,
                to: UploadStatus::Error,
            }),
        }
    }

    /// Explicit `error -> pending` reset, the precondition for retrying a
    /// failed entry on the next upload pass.
    pub fn reset(&mut self) -> Result<(), EntryStateError> {
        match self.status {
            UploadStatus::Error => {
                self.status = UploadStatus::Pending;
                self.progress = 0;
                self.error = None;
                self.document_id = None;
                Ok(())
            }
            from => Err(EntryStateError {
                from,
                to: UploadStatus::Pending,
            }),
        }
    }
}
