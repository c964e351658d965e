//! Pre-transport file and metadata validation.
//!
//! Validation runs synchronously before a file ever reaches the transport:
//! size cap, extension and content-type allow-lists, and the cross-check
//! between the two. Upload metadata (title, tags) has its own bounds so a
//! malformed form field is rejected client-side instead of round-tripping.

use regex::Regex;
use std::path::Path;

use crate::config::UploadLimits;
use crate::models::{DocumentUpload, FilePayload};

/// Maximum length for a document title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length for a document description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Maximum number of tags per document.
pub const MAX_TAGS: usize = 20;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
}

/// Document file validator over a configured set of limits.
pub struct DocumentValidator {
    limits: UploadLimits,
}

impl DocumentValidator {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits }
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.limits.max_file_size_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.limits.max_file_size_bytes,
            });
        }

        Ok(())
    }

    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.limits.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.limits.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .limits
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.limits.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Reject files whose declared Content-Type does not match their
    /// extension, so a mislabelled binary can't slip through the allow-list.
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        let normalized = content_type.to_lowercase();

        let expected: Vec<&str> = match extension.as_str() {
            "pdf" => vec!["application/pdf"],
            "doc" => vec!["application/msword"],
            "docx" => {
                vec!["application/vnd.openxmlformats-officedocument.wordprocessingml.document"]
            }
            "xls" => vec!["application/vnd.ms-excel"],
            "xlsx" => vec!["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
            "ppt" => vec!["application/vnd.ms-powerpoint"],
            "pptx" => {
                vec!["application/vnd.openxmlformats-officedocument.presentationml.presentation"]
            }
            "txt" => vec!["text/plain"],
            "csv" => vec!["text/csv"],
            "jpg" | "jpeg" => vec!["image/jpeg"],
            "png" => vec!["image/png"],
            "tif" | "tiff" => vec!["image/tiff"],
            _ => {
                tracing::debug!(
                    extension = %extension,
                    content_type = %content_type,
                    "Unknown extension, skipping Content-Type/extension cross-validation"
                );
                return Ok(());
            }
        };

        if !expected.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: format!(
                    "{} (does not match extension '{}'. Expected one of: {})",
                    content_type,
                    extension,
                    expected.join(", ")
                ),
                allowed: self.limits.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate every aspect of a file before it is queued for transport.
    pub fn validate_file(&self, file: &FilePayload) -> Result<(), ValidationError> {
        self.validate_file_size(file.size())?;
        self.validate_extension(&file.name)?;
        self.validate_content_type(&file.content_type)?;
        self.validate_extension_content_type_match(&file.name, &file.content_type)?;
        Ok(())
    }
}

/// Reduce a user-supplied filename to a safe form for the multipart
/// `filename` field: base name only, path traversal rejected, characters
/// outside `[alphanumeric . - _]` replaced, length capped at 255.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if base.contains("..") {
        return "invalid_filename".to_string();
    }

    let sanitized: String = base
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Validate the non-file upload fields: title/description lengths, tag
/// count, and tag character set (letters, digits, underscore, hyphen, dot,
/// colon).
pub fn validate_upload_metadata(upload: &DocumentUpload) -> Result<(), ValidationError> {
    if let Some(title) = &upload.title {
        if title.trim().is_empty() {
            return Err(ValidationError::InvalidMetadata(
                "Title cannot be blank".to_string(),
            ));
        }
        if title.len() > MAX_TITLE_LENGTH {
            return Err(ValidationError::InvalidMetadata(format!(
                "Title exceeds maximum length of {} characters",
                MAX_TITLE_LENGTH
            )));
        }
    }

    if let Some(description) = &upload.description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::InvalidMetadata(format!(
                "Description exceeds maximum length of {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
    }

    if upload.category.trim().is_empty() {
        return Err(ValidationError::InvalidMetadata(
            "Category is required".to_string(),
        ));
    }

    if upload.tags.len() > MAX_TAGS {
        return Err(ValidationError::InvalidMetadata(format!(
            "Document has {} tags, but maximum allowed is {}",
            upload.tags.len(),
            MAX_TAGS
        )));
    }

    let pattern = Regex::new(r"^[a-zA-Z0-9_\-\.:]+$")
        .map_err(|e| ValidationError::InvalidMetadata(format!("tag pattern: {}", e)))?;

    for tag in &upload.tags {
        if tag.is_empty() || tag.len() > MAX_TAG_LENGTH {
            return Err(ValidationError::InvalidMetadata(format!(
                "Tag '{}' must be 1-{} characters",
                tag, MAX_TAG_LENGTH
            )));
        }
        if !pattern.is_match(tag) {
            return Err(ValidationError::InvalidMetadata(format!(
                "Tag '{}' contains invalid characters. Allowed: letters, digits, underscore (_), hyphen (-), dot (.), colon (:)",
                tag
            )));
        }
    }

    Ok(())
}
