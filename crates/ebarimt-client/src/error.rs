//! # Client Error Types and Call Outcomes
//!
//! ## Two Kinds of "Failure"
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TRANSPORT FAILURE (ClientError)      REMOTE REJECTION (ApiOutcome)    │
//! │  ───────────────────────────────      ─────────────────────────────    │
//! │  • timeout / connection refused       • HTTP 200, success:false        │
//! │  • non-2xx, no parseable body         • envelope status != 200         │
//! │  • malformed JSON                     • "TIN not found", etc.          │
//! │                                                                         │
//! │  → retryable by the workflow          → retryable only if the doc      │
//! │                                         or remote condition changes    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Client Error (transport-level)
// =============================================================================

/// Transport-level client errors.
///
/// A `ClientError` means the request never produced an interpretable
/// answer from the tax authority. Remote business-rule refusals are NOT
/// errors; see [`ApiOutcome::Rejected`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure: timeout, DNS, connection refused/reset.
    #[error("eBarimt API connection failed: {message}")]
    Transport { message: String },

    /// Non-2xx response with no parseable failure body.
    #[error("eBarimt API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx response whose body could not be decoded.
    #[error("Malformed eBarimt API response: {message}")]
    MalformedResponse { message: String },

    /// Token acquisition failed (bad credentials, auth server down).
    #[error("eBarimt authentication failed: {message}")]
    Auth { message: String },

    /// A required configuration value is missing.
    #[error("eBarimt client is not configured: {field} is missing")]
    NotConfigured { field: &'static str },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport {
                message: format!("timeout: {err}"),
            }
        } else if err.is_connect() {
            ClientError::Transport {
                message: format!("connection failed: {err}"),
            }
        } else if err.is_decode() {
            ClientError::MalformedResponse {
                message: err.to_string(),
            }
        } else {
            ClientError::Transport {
                message: err.to_string(),
            }
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// Api Outcome (business-level)
// =============================================================================

/// An explicit refusal from the tax authority.
///
/// The message is preserved verbatim; the workflow records it on the
/// receipt log without reinterpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRejection {
    /// Remote error message, verbatim.
    pub message: String,
    /// Remote status code from the response envelope, when present.
    pub code: Option<i64>,
}

impl std::fmt::Display for RemoteRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Business-level outcome of a successfully transported call.
#[derive(Debug, Clone)]
pub enum ApiOutcome<T> {
    /// The remote accepted the request; payload parsed.
    Success(T),
    /// The remote explicitly rejected the request.
    Rejected(RemoteRejection),
}

impl<T> ApiOutcome<T> {
    /// Returns the payload, discarding a rejection.
    pub fn success(self) -> Option<T> {
        match self {
            ApiOutcome::Success(v) => Some(v),
            ApiOutcome::Rejected(_) => None,
        }
    }

    /// Whether the remote rejected the request.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiOutcome::Rejected(_))
    }

    /// Maps the success payload, keeping rejections untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Success(v) => ApiOutcome::Success(f(v)),
            ApiOutcome::Rejected(r) => ApiOutcome::Rejected(r),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_not_an_error() {
        let outcome: ClientResult<ApiOutcome<()>> =
            Ok(ApiOutcome::Rejected(RemoteRejection {
                message: "TIN not found".to_string(),
                code: Some(400),
            }));
        let outcome = outcome.unwrap();
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_outcome_map_preserves_rejection() {
        let rejected: ApiOutcome<i32> = ApiOutcome::Rejected(RemoteRejection {
            message: "no".into(),
            code: None,
        });
        let mapped = rejected.map(|v| v * 2);
        assert!(mapped.is_rejected());

        let ok: ApiOutcome<i32> = ApiOutcome::Success(21);
        match ok.map(|v| v * 2) {
            ApiOutcome::Success(v) => assert_eq!(v, 42),
            ApiOutcome::Rejected(_) => panic!("expected success"),
        }
    }
}
