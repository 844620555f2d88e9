//! Access control modes
//!
//! A transaction is started in an [`AccessMode`]; each procedure declares a
//! [`ProcedureMode`]. Write procedures are refused in read-only transactions.

use serde::{Deserialize, Serialize};

/// Controls whether a transaction allows writes or is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    /// Allow both reads and writes (default).
    #[default]
    ReadWrite,
    /// Read-only mode: write procedures return an error.
    ReadOnly,
}

impl AccessMode {
    /// Check whether a procedure of the given mode may run
    pub fn allows(&self, mode: ProcedureMode) -> bool {
        match (self, mode) {
            (AccessMode::ReadWrite, _) => true,
            (AccessMode::ReadOnly, ProcedureMode::Read) => true,
            (AccessMode::ReadOnly, ProcedureMode::Write) => false,
        }
    }
}

/// Declared effect class of a procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcedureMode {
    /// Only reads
    Read,
    /// May write
    Write,
}

impl ProcedureMode {
    /// Upper-case mode name (`READ`, `WRITE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureMode::Read => "READ",
            ProcedureMode::Write => "WRITE",
        }
    }
}
