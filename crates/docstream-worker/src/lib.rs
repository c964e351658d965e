//! Upload lifecycle orchestration: the per-session upload queue and the
//! processing-status poller. Both operate on the trait seams defined in
//! `docstream-core`, so they are independent of the HTTP layer.

pub mod poller;
pub mod queue;

pub use poller::{PollerConfig, ProcessingPoller};
pub use queue::{QueueError, UploadQueue, UploadQueueConfig, UploadSummary};
