//! Docstream Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all Docstream components, plus the trait seams
//! (`DocumentTransport`, `DocumentCatalog`) that decouple the upload queue
//! and the status poller from the HTTP layer.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod transport;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, UploadLimits};
pub use error::{PollError, TransportError};
pub use hooks::{NoOpProcessingObserver, NoOpProgressSink, ProcessingObserver, ProgressSink};
pub use transport::{DocumentCatalog, DocumentTransport};
pub use validation::{sanitize_filename, DocumentValidator, ValidationError};
