use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Server-side processing state for an uploaded document.
/// `Completed` and `Error` are terminal: once observed, no further status
/// request may be issued for that document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Error)
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Error => write!(f, "error"),
        }
    }
}

/// One snapshot from the processing-status endpoint. The wire format is
/// camelCase (`ocrProgress`, `aiProgress`); servers may omit `documentId`,
/// in which case it defaults to the nil UUID (callers already know which
/// document they asked about).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingProgress {
    #[serde(default)]
    pub document_id: Uuid,
    #[serde(default)]
    pub ocr_progress: u8,
    #[serde(default)]
    pub ai_progress: u8,
    pub status: ProcessingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
