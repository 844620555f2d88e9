//! Statement leases
//!
//! A [`StatementLease`] owns one statement acquired from the caller's
//! transaction and closes it exactly once. There are two disposal paths:
//!
//! - **Synchronous**: the procedure finishes its reads and calls
//!   [`StatementLease::close`] (or uses [`with_statement`]) before returning.
//! - **Transferred**: the lease is moved into a [`ResultStream`], which closes
//!   it on exhaustion, on `close()`, or when dropped.
//!
//! Dropping a lease closes it, so an early return with `?` between
//! acquisition and transfer cannot leak the statement.
//!
//! [`ResultStream`]: crate::ResultStream

use std::fmt;

use stratagraph_core::{KernelTransaction, ReadOperations, Statement};
use tracing::trace;

use crate::{Error, Result};

/// A statement on loan from the caller's transaction
pub struct StatementLease {
    statement: Option<Box<dyn Statement>>,
}

impl StatementLease {
    /// Acquire a statement from the transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionUnavailable` if the transaction cannot issue one.
    pub fn acquire(tx: &dyn KernelTransaction) -> Result<Self> {
        let statement = tx.acquire_statement()?;
        trace!(target: "stratagraph::lease", "Statement leased");
        Ok(StatementLease {
            statement: Some(statement),
        })
    }

    /// Reads bound to the leased statement
    pub fn read(&self) -> Result<&dyn ReadOperations> {
        self.statement
            .as_deref()
            .map(|statement| statement.read_operations())
            .ok_or_else(|| Error::Internal {
                reason: "statement lease used after release".into(),
            })
    }

    /// Release the statement now
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(statement) = self.statement.take() {
            statement.close();
            trace!(target: "stratagraph::lease", "Statement released");
        }
    }
}

impl Drop for StatementLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for StatementLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementLease")
            .field("open", &self.statement.is_some())
            .finish()
    }
}

/// Run `f` against a freshly leased statement and release it before
/// returning, whether `f` succeeds or fails.
pub fn with_statement<T, F>(tx: &dyn KernelTransaction, f: F) -> Result<T>
where
    F: FnOnce(&dyn ReadOperations) -> Result<T>,
{
    let lease = StatementLease::acquire(tx)?;
    let result = lease.read().and_then(f);
    lease.close();
    result
}
