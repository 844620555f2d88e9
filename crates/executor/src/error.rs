//! Error types for procedure execution.
//!
//! All errors from procedure execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Classified**: [`Error::status`] yields a stable dotted status code

use serde::{Deserialize, Serialize};
use stratagraph_core::EntityType;

/// Procedure execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Transaction | `TransactionUnavailable` | No statement could be acquired |
/// | Schema | `IndexNotFound`, `NoSuchLabel`, `NoSuchPropertyKey`, `IndexFailed`, `ConstraintViolation` | Schema lookups and state |
/// | Manual index | `LegacyIndexNotFound` | Named manual index does not exist |
/// | Entity | `NodeNotFound`, `RelationshipNotFound` | Entity id does not resolve |
/// | Procedure | `ProcedureNotFound`, `InvalidArgument`, `WrongArgumentType`, `UnsupportedValue`, `ProcedureTimedOut` | Call binding and execution |
/// | Security | `AccessDenied` | Write procedure in a read-only transaction |
/// | System | `Serialization`, `Internal` | Infrastructure errors |
///
/// # Example
///
/// ```ignore
/// use stratagraph_executor::{Error, Procedure};
///
/// match executor.execute(&tx, procedure) {
///     Ok(output) => { /* consume records */ }
///     Err(Error::LegacyIndexNotFound { name, .. }) => {
///         println!("no manual index named '{}'", name);
///     }
///     Err(e) => println!("{}: {}", e.status(), e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Transaction ====================
    /// The transaction cannot issue a statement
    #[error("transaction unavailable: {reason}")]
    TransactionUnavailable { reason: String },

    // ==================== Schema ====================
    /// No schema index matches
    #[error("No index on {index}")]
    IndexNotFound { index: String },

    /// Label name is not known to the database
    #[error("No such label {label}")]
    NoSuchLabel { label: String },

    /// Property key name is not known to the database
    #[error("No such property key {property}")]
    NoSuchPropertyKey { property: String },

    /// Schema index population failed
    #[error("Index {index} is in a failed state")]
    IndexFailed { index: String },

    /// A schema constraint would be violated
    #[error("constraint violation: {reason}")]
    ConstraintViolation { reason: String },

    // ==================== Manual index ====================
    /// A named manual index does not exist
    #[error("{entity} index {name} not found")]
    LegacyIndexNotFound { entity: EntityType, name: String },

    // ==================== Entity ====================
    /// Node id does not resolve
    #[error("Node {id} not found")]
    NodeNotFound { id: u64 },

    /// Relationship id does not resolve
    #[error("Relationship {id} not found")]
    RelationshipNotFound { id: u64 },

    // ==================== Procedure ====================
    /// No procedure is registered under the name
    #[error("There is no procedure with the name `{name}` registered")]
    ProcedureNotFound { name: String },

    /// An argument is malformed or out of range
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A positional argument has the wrong type for its parameter
    #[error("wrong type for parameter '{parameter}': expected {expected}, got {actual}")]
    WrongArgumentType {
        parameter: String,
        expected: String,
        actual: String,
    },

    /// A value kind is not accepted by the index engine
    #[error("unsupported value: expected {expected}, got {actual}")]
    UnsupportedValue { expected: String, actual: String },

    /// A blocking wait ran past its deadline
    #[error("Timed out after {seconds} seconds waiting for {waiting_for}")]
    ProcedureTimedOut { waiting_for: String, seconds: u64 },

    // ==================== Security ====================
    /// Write procedure called in a read-only transaction
    #[error("access denied: {procedure} is a write procedure and the transaction is read-only")]
    AccessDenied { procedure: String },

    // ==================== System ====================
    /// Serialization error
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Dotted status code: classification, category and title.
    ///
    /// Client errors are caused by the call itself and will fail again if
    /// retried unchanged; transient errors may succeed on retry; database
    /// errors indicate an engine-side failure.
    pub fn status(&self) -> &'static str {
        match self {
            Error::TransactionUnavailable { .. } => {
                "TransientError.Transaction.TransactionUnavailable"
            }
            Error::IndexNotFound { .. } => "ClientError.Schema.IndexNotFound",
            Error::NoSuchLabel { .. } => "ClientError.Schema.NoSuchLabel",
            Error::NoSuchPropertyKey { .. } => "ClientError.Schema.NoSuchPropertyKey",
            Error::IndexFailed { .. } => "DatabaseError.Schema.IndexFailed",
            Error::ConstraintViolation { .. } => "ClientError.Schema.ConstraintValidationFailed",
            Error::LegacyIndexNotFound { .. } => "ClientError.LegacyIndex.LegacyIndexNotFound",
            Error::NodeNotFound { .. } | Error::RelationshipNotFound { .. } => {
                "ClientError.Statement.EntityNotFound"
            }
            Error::ProcedureNotFound { .. } => "ClientError.Procedure.ProcedureNotFound",
            Error::InvalidArgument { .. } | Error::WrongArgumentType { .. } => {
                "ClientError.Procedure.ProcedureCallFailed"
            }
            Error::UnsupportedValue { .. } => "ClientError.Statement.TypeError",
            Error::ProcedureTimedOut { .. } => "TransientError.Procedure.ProcedureTimedOut",
            Error::AccessDenied { .. } => "ClientError.Security.Forbidden",
            Error::Serialization { .. } => "DatabaseError.General.SerializationFailed",
            Error::Internal { .. } => "DatabaseError.General.UnknownError",
        }
    }

    /// Check whether retrying the same call might succeed
    pub fn is_transient(&self) -> bool {
        self.status().starts_with("TransientError.")
    }
}
