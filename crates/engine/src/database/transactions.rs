//! Transactions and statement accounting
//!
//! A [`Transaction`] hands out statements to the procedure layer and counts
//! how many are still open. Closing a transaction with open statements is a
//! leak and is reported.
//!
//! # Memory Ordering
//!
//! The statement counters use `SeqCst`: tests read them from other threads
//! right after a stream is dropped and expect the release to be visible.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use stratagraph_core::{AccessMode, GraphError, GraphResult, KernelTransaction, Statement};
use tracing::{debug, warn};

use super::statement::EngineStatement;
use super::Shared;

/// Per-transaction statement bookkeeping, shared with its statements
#[derive(Debug, Default)]
pub(crate) struct TransactionState {
    open_statements: AtomicUsize,
    statements_acquired: AtomicUsize,
    statements_closed: AtomicUsize,
    closed: AtomicBool,
}

impl TransactionState {
    /// Called exactly once per statement, when it is closed.
    ///
    /// A close with no statement open is a double release: it is counted
    /// and logged, and reported again when the transaction closes.
    pub(crate) fn statement_closed(&self) {
        self.statements_closed.fetch_add(1, Ordering::SeqCst);
        let released = self
            .open_statements
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |x| x.checked_sub(1));
        if released.is_err() {
            warn!(
                target: "stratagraph::txn",
                closed = self.statements_closed.load(Ordering::SeqCst),
                acquired = self.statements_acquired.load(Ordering::SeqCst),
                "Statement released with none open"
            );
        }
    }
}

/// A caller transaction over the in-memory store
///
/// Reads through its statements observe the live store; there is no
/// snapshot isolation.
pub struct Transaction {
    id: u64,
    mode: AccessMode,
    shared: Arc<Shared>,
    state: Arc<TransactionState>,
}

impl Transaction {
    pub(crate) fn new(id: u64, mode: AccessMode, shared: Arc<Shared>) -> Self {
        debug!(target: "stratagraph::txn", txn_id = id, mode = ?mode, "Transaction started");
        Transaction {
            id,
            mode,
            shared,
            state: Arc::new(TransactionState::default()),
        }
    }

    /// Transaction id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Statements acquired and not yet closed
    pub fn open_statements(&self) -> usize {
        self.state.open_statements.load(Ordering::SeqCst)
    }

    /// Statements acquired over the transaction's lifetime
    pub fn statements_acquired(&self) -> usize {
        self.state.statements_acquired.load(Ordering::SeqCst)
    }

    /// Statement closes observed over the transaction's lifetime.
    ///
    /// Equal to [`statements_acquired`](Self::statements_acquired) once
    /// every statement has been released exactly once.
    pub fn statements_closed(&self) -> usize {
        self.state.statements_closed.load(Ordering::SeqCst)
    }

    /// Check whether the transaction has been closed
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Close the transaction.
    ///
    /// Further statement acquisition fails with `TransactionUnavailable`.
    /// Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if statements are still open.
    pub fn close(&self) -> GraphResult<()> {
        if self.state.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let open = self.open_statements();
        if open > 0 {
            warn!(
                target: "stratagraph::txn",
                txn_id = self.id,
                open_statements = open,
                "Transaction closed with statements still open"
            );
            return Err(GraphError::internal(format!(
                "transaction {} closed with {} open statement(s)",
                self.id, open
            )));
        }
        let acquired = self.statements_acquired();
        let released = self.statements_closed();
        if released > acquired {
            warn!(
                target: "stratagraph::txn",
                txn_id = self.id,
                acquired,
                released,
                "Transaction closed after a statement was released twice"
            );
            return Err(GraphError::internal(format!(
                "transaction {} released {} statement(s) but acquired {}",
                self.id, released, acquired
            )));
        }
        debug!(
            target: "stratagraph::txn",
            txn_id = self.id,
            statements = self.statements_acquired(),
            "Transaction closed"
        );
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        // a leak is already logged by close()
        let _ = self.close();
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("open_statements", &self.open_statements())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl KernelTransaction for Transaction {
    fn acquire_statement(&self) -> GraphResult<Box<dyn Statement>> {
        if self.is_closed() {
            return Err(GraphError::transaction_unavailable(format!(
                "transaction {} is closed",
                self.id
            )));
        }
        self.state.open_statements.fetch_add(1, Ordering::SeqCst);
        self.state.statements_acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(EngineStatement::new(
            Arc::clone(&self.shared),
            Arc::clone(&self.state),
        )))
    }

    fn access_mode(&self) -> AccessMode {
        self.mode
    }
}
