//! # Workflow Error Types
//!
//! The error surface the host framework sees.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ABORT SYNCHRONOUSLY (no log write)    RECORDED ON THE LOG             │
//! │  ──────────────────────────────────    ────────────────────            │
//! │  Validation  payload can't be built    Transport  network failure      │
//! │  State       wrong log status          Remote     authority refused    │
//! │  Document    source doc won't load     (submit returns the Failed      │
//! │  Db          repository failure         log; void surfaces these       │
//! │                                         as errors instead)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use ebarimt_client::{ClientError, RemoteRejection};
use ebarimt_core::{CoreError, ValidationError};
use ebarimt_db::DbError;

use crate::document::DocumentLoadError;

/// Errors surfaced by workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The payload could not be built from the document.
    /// Submission was never attempted; no log was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The receipt log is in a state that forbids the operation
    /// (submitting over a Success receipt, voiding a non-Success one).
    /// No state change, no log write.
    #[error(transparent)]
    State(#[from] CoreError),

    /// The request never produced an interpretable remote answer.
    #[error(transparent)]
    Transport(#[from] ClientError),

    /// The tax authority explicitly refused the request.
    /// The message is verbatim from the remote.
    #[error("eBarimt rejected the request: {0}")]
    Remote(RemoteRejection),

    /// A local persistence operation failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The source document could not be loaded from the host framework.
    #[error(transparent)]
    Document(#[from] DocumentLoadError),
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_message() {
        let err = WorkflowError::State(CoreError::InvalidReceiptStatus {
            reference: "Sales Invoice/SINV-0001".to_string(),
            current_status: "Success".to_string(),
            operation: "submit".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Receipt log for Sales Invoice/SINV-0001 is Success, cannot submit"
        );
    }

    #[test]
    fn test_remote_error_keeps_verbatim_message() {
        let err = WorkflowError::Remote(RemoteRejection {
            message: "TIN not found".to_string(),
            code: Some(400),
        });
        assert_eq!(err.to_string(), "eBarimt rejected the request: TIN not found");
    }
}
