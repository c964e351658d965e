pub mod document;
pub mod processing;
pub mod upload;

pub use document::{DocumentPriority, DocumentRecord, DocumentUpload};
pub use processing::{ProcessingProgress, ProcessingStatus};
pub use upload::{EntryStateError, FilePayload, UploadEntry, UploadStatus};
