use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::upload::FilePayload;

/// Document priority as the remote API understands it: a numeric 1-4 scale.
/// Never on the wire as an enum; the upload form and `DocumentRecord` carry
/// the numeric value, converted through `as_i32`/`from_i32`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DocumentPriority {
    Low = 1,
    #[default]
    Normal = 2,
    High = 3,
    Urgent = 4,
}

impl DocumentPriority {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    pub fn from_i32(value: i32) -> Self {
        match value {
            i32::MIN..=1 => DocumentPriority::Low,
            2 => DocumentPriority::Normal,
            3 => DocumentPriority::High,
            _ => DocumentPriority::Urgent,
        }
    }
}

impl From<DocumentPriority> for i32 {
    fn from(priority: DocumentPriority) -> Self {
        priority as i32
    }
}

/// Metadata accompanying an upload: the non-file multipart fields.
///
/// `title` defaults to the filename stem when unset; `tags` are JSON-encoded
/// into a single form field.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub priority: DocumentPriority,
    pub tags: Vec<String>,
}

impl DocumentUpload {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    /// Title to send for a given file: the explicit title, or the filename
    /// without its extension.
    pub fn resolved_title(&self, file: &FilePayload) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| file.stem().to_string())
    }
}

/// The remote document as the service reports it. `ocr_text` and
/// `ai_summary` stay absent until server-side processing completes; the
/// detail read after a completed watch is what picks them up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub priority: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn priority(&self) -> DocumentPriority {
        DocumentPriority::from_i32(self.priority)
    }

    /// Whether OCR/AI results have landed on this record.
    pub fn has_analysis(&self) -> bool {
        self.ocr_text.is_some() || self.ai_summary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_as_i32() {
        assert_eq!(DocumentPriority::Low.as_i32(), 1);
        assert_eq!(DocumentPriority::Normal.as_i32(), 2);
        assert_eq!(DocumentPriority::High.as_i32(), 3);
        assert_eq!(DocumentPriority::Urgent.as_i32(), 4);
    }

    #[test]
    fn test_priority_from_i32() {
        assert_eq!(DocumentPriority::from_i32(0), DocumentPriority::Low);
        assert_eq!(DocumentPriority::from_i32(1), DocumentPriority::Low);
        assert_eq!(DocumentPriority::from_i32(2), DocumentPriority::Normal);
        assert_eq!(DocumentPriority::from_i32(3), DocumentPriority::High);
        assert_eq!(DocumentPriority::from_i32(4), DocumentPriority::Urgent);
        assert_eq!(DocumentPriority::from_i32(100), DocumentPriority::Urgent);
    }

    #[test]
    fn test_priority_default() {
        assert_eq!(DocumentPriority::default(), DocumentPriority::Normal);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(DocumentPriority::Low < DocumentPriority::Normal);
        assert!(DocumentPriority::Normal < DocumentPriority::High);
        assert!(DocumentPriority::High < DocumentPriority::Urgent);
    }

    #[test]
    fn test_resolved_title_falls_back_to_stem() {
        let upload = DocumentUpload::new("invoices");
        let file = FilePayload::new("q3-report.pdf", "application/pdf", vec![0u8]);
        assert_eq!(upload.resolved_title(&file), "q3-report");

        let named = DocumentUpload {
            title: Some("Q3 Report".to_string()),
            ..DocumentUpload::new("invoices")
        };
        assert_eq!(named.resolved_title(&file), "Q3 Report");
    }

    #[test]
    fn test_document_record_deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": "d2e8f4a1-7b3c-4d6e-8f9a-0b1c2d3e4f5a",
            "filename": "report.pdf",
            "content_type": "application/pdf",
            "file_size": 1024,
            "title": "report",
            "category": "general",
            "priority": 2,
            "uploaded_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        });

        let record: DocumentRecord = serde_json::from_value(json).unwrap();
        assert!(record.tags.is_empty());
        assert!(record.ocr_text.is_none());
        assert!(!record.has_analysis());
        assert_eq!(record.priority(), DocumentPriority::Normal);
    }

    #[test]
    fn test_document_record_has_analysis_after_processing() {
        let json = serde_json::json!({
            "id": "d2e8f4a1-7b3c-4d6e-8f9a-0b1c2d3e4f5a",
            "filename": "report.pdf",
            "content_type": "application/pdf",
            "file_size": 1024,
            "title": "report",
            "category": "general",
            "priority": 4,
            "tags": ["finance", "q3"],
            "ocr_text": "Quarterly results...",
            "ai_summary": "Revenue grew 12%.",
            "uploaded_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:05:00Z"
        });

        let record: DocumentRecord = serde_json::from_value(json).unwrap();
        assert!(record.has_analysis());
        assert_eq!(record.tags, vec!["finance", "q3"]);
        assert_eq!(record.priority(), DocumentPriority::Urgent);
    }
}
