//! Error types for StrataGraph
//!
//! This module defines the engine-facing error type used by every
//! collaborator trait. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.

use std::time::Duration;
use thiserror::Error;

use crate::types::{EntityType, NodeId, RelationshipId};

/// Result type alias for engine operations
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Error types raised by the engine and its collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The transaction cannot issue a statement
    #[error("Transaction unavailable: {reason}")]
    TransactionUnavailable {
        /// Why the transaction is unavailable
        reason: String,
    },

    /// A schema index does not exist
    #[error("Index not found: {index}")]
    IndexNotFound {
        /// Description of the missing index
        index: String,
    },

    /// A schema index is in the failed state
    #[error("Index failed: {index}")]
    IndexFailed {
        /// Description of the failed index
        index: String,
    },

    /// A manual index does not exist
    #[error("{entity} index {name} not found")]
    LegacyIndexNotFound {
        /// Entity kind of the index
        entity: EntityType,
        /// Index name
        name: String,
    },

    /// A node does not exist
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    /// A relationship does not exist
    #[error("Relationship {0} not found")]
    RelationshipNotFound(RelationshipId),

    /// A token id has no name
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    /// A blocking wait ran past its deadline
    #[error("Timed out after {timeout:?} waiting for {waiting_for}")]
    Timeout {
        /// What was being waited for
        waiting_for: String,
        /// The deadline that elapsed
        timeout: Duration,
    },

    /// A value kind is not accepted
    #[error("Unsupported value: expected {expected}, got {actual}")]
    UnsupportedValue {
        /// Accepted kinds
        expected: String,
        /// Supplied kind
        actual: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A schema constraint would be violated
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Internal error (bug or invariant violation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GraphError {
    /// Create an `InvalidInput` error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        GraphError::InvalidInput(reason.into())
    }

    /// Create an `UnsupportedValue` error
    pub fn unsupported_value(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        GraphError::UnsupportedValue {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a `TransactionUnavailable` error
    pub fn transaction_unavailable(reason: impl Into<String>) -> Self {
        GraphError::TransactionUnavailable {
            reason: reason.into(),
        }
    }

    /// Create an `Internal` error
    pub fn internal(reason: impl Into<String>) -> Self {
        GraphError::Internal(reason.into())
    }

    /// Check whether this is a missing manual index
    pub fn is_legacy_index_not_found(&self) -> bool {
        matches!(self, GraphError::LegacyIndexNotFound { .. })
    }
}
