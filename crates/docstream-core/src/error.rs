//! Error types module
//!
//! Transport failures and polling failures are kept as separate enums so the
//! upload queue and the status poller each contain exactly the failures they
//! can recover from. Whether a failure is worth retrying is a property of the
//! error itself (`TransportError::is_transient`), not of the call site.

/// Failure of a single HTTP exchange with the document service.
///
/// Transport never retries internally; the caller decides. `Api` carries the
/// HTTP status plus the human-readable message extracted from the response
/// body, which is what ends up on a failed entry's `error` field.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request cancelled")]
    Cancelled,
}

impl TransportError {
    /// Whether retrying the same request later could succeed. Network
    /// failures, server errors, and throttling are transient; everything
    /// else (4xx rejections, malformed responses, cancellation) is not.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Network(_) => true,
            TransportError::Api { status, .. } => *status >= 500 || *status == 429,
            TransportError::InvalidRequest(_)
            | TransportError::InvalidResponse(_)
            | TransportError::Cancelled => false,
        }
    }
}

/// Failure of a processing-status watch.
///
/// A terminal `error` status reported by the service is not in this enum:
/// the watch returns it as a successful observation. This enum covers the
/// watch itself going wrong.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The service reported terminal failure for the document. Produced by
    /// `wait_for_document`, which folds the terminal snapshot into an error.
    #[error("document processing failed: {message}")]
    ProcessingFailed { message: String },

    /// Too many consecutive transient poll failures; the watch gave up
    /// rather than retry silently forever.
    #[error("status polling aborted after {attempts} consecutive failures")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last_error: TransportError,
    },

    /// A non-transient transport failure (unknown document, revoked token).
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("polling cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_transient() {
        assert!(TransportError::Network("connection refused".into()).is_transient());
    }

    #[test]
    fn test_server_errors_are_transient() {
        assert!(TransportError::Api {
            status: 500,
            message: "internal error".into()
        }
        .is_transient());
        assert!(TransportError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_transient());
        assert!(TransportError::Api {
            status: 429,
            message: "slow down".into()
        }
        .is_transient());
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        assert!(!TransportError::Api {
            status: 404,
            message: "not found".into()
        }
        .is_transient());
        assert!(!TransportError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_transient());
        assert!(!TransportError::InvalidRequest("bad mime".into()).is_transient());
        assert!(!TransportError::InvalidResponse("truncated JSON".into()).is_transient());
        assert!(!TransportError::Cancelled.is_transient());
    }

    #[test]
    fn test_api_error_message_includes_status_and_detail() {
        let err = TransportError::Api {
            status: 500,
            message: "OCR backend unavailable".into(),
        };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("OCR backend unavailable"));
    }

    #[test]
    fn test_poll_error_wraps_transport_error() {
        let err: PollError = TransportError::Api {
            status: 404,
            message: "no such document".into(),
        }
        .into();
        assert!(err.to_string().contains("no such document"));
    }
}
