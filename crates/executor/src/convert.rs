//! Error conversion from engine error types.
//!
//! This module provides the conversion from [`GraphError`] to the executor's
//! [`Error`] type, so handlers can propagate collaborator failures with `?`.

use stratagraph_core::GraphError;

use crate::Error;

/// Convert a GraphError to an executor Error.
///
/// This preserves all error details while mapping to the appropriate
/// executor error variant.
impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::TransactionUnavailable { reason } => {
                Error::TransactionUnavailable { reason }
            }

            // Schema errors
            GraphError::IndexNotFound { index } => Error::IndexNotFound { index },
            GraphError::IndexFailed { index } => Error::IndexFailed { index },
            GraphError::ConstraintViolation(reason) => Error::ConstraintViolation { reason },

            GraphError::LegacyIndexNotFound { entity, name } => {
                Error::LegacyIndexNotFound { entity, name }
            }

            // Entity errors
            GraphError::NodeNotFound(id) => Error::NodeNotFound { id: id.as_u64() },
            GraphError::RelationshipNotFound(id) => Error::RelationshipNotFound { id: id.as_u64() },

            GraphError::Timeout {
                waiting_for,
                timeout,
            } => Error::ProcedureTimedOut {
                waiting_for,
                seconds: timeout.as_secs(),
            },

            // Validation errors
            GraphError::UnsupportedValue { expected, actual } => {
                Error::UnsupportedValue { expected, actual }
            }
            GraphError::InvalidInput(reason) => Error::InvalidArgument { reason },

            // A token that cannot be named is an engine inconsistency
            GraphError::TokenNotFound(token) => Error::Internal {
                reason: format!("token not found: {}", token),
            },
            GraphError::Internal(reason) => Error::Internal { reason },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            reason: err.to_string(),
        }
    }
}
