//! Index population waits and sampling
//!
//! Waiters block on `Shared::index_changed`. State changes bump the signal
//! generation after releasing the store lock, so a waiter that checked the
//! state while holding the signal mutex cannot miss a wakeup.

use std::time::{Duration, Instant};

use stratagraph_core::{
    GraphError, GraphResult, IndexDescriptor, IndexSamplingMode, IndexState, IndexingService,
};
use tracing::debug;

use super::Database;
use crate::store::IndexEntry;

enum Readiness {
    Ready,
    Waiting,
}

impl Database {
    fn index_readiness(&self, index: &IndexDescriptor) -> GraphResult<Readiness> {
        let store = self.shared.store.read();
        match store.indexes.get(index).map(|entry| entry.state) {
            None => Err(GraphError::IndexNotFound {
                index: index.user_description(&*store),
            }),
            Some(IndexState::Online) => Ok(Readiness::Ready),
            Some(IndexState::Failed) => Err(GraphError::IndexFailed {
                index: index.user_description(&*store),
            }),
            Some(IndexState::Populating) => Ok(Readiness::Waiting),
        }
    }

    fn all_readiness(&self) -> GraphResult<Readiness> {
        let store = self.shared.store.read();
        let mut readiness = Readiness::Ready;
        for (descriptor, entry) in &store.indexes {
            match entry.state {
                IndexState::Online => {}
                IndexState::Populating => readiness = Readiness::Waiting,
                IndexState::Failed => {
                    return Err(GraphError::IndexFailed {
                        index: descriptor.user_description(&*store),
                    })
                }
            }
        }
        Ok(readiness)
    }

    fn await_readiness(
        &self,
        waiting_for: impl Fn() -> String,
        timeout: Duration,
        check: impl Fn() -> GraphResult<Readiness>,
    ) -> GraphResult<()> {
        // a deadline past what Instant can represent waits without bound
        let deadline = Instant::now().checked_add(timeout);
        let mut generation = self.shared.index_signal.lock();
        let mut timed_out = false;
        loop {
            match check()? {
                Readiness::Ready => return Ok(()),
                Readiness::Waiting if timed_out => {
                    return Err(GraphError::Timeout {
                        waiting_for: waiting_for(),
                        timeout,
                    })
                }
                Readiness::Waiting => {}
            }
            match deadline {
                Some(deadline) => {
                    timed_out = self
                        .shared
                        .index_changed
                        .wait_until(&mut generation, deadline)
                        .timed_out();
                }
                None => self.shared.index_changed.wait(&mut generation),
            }
        }
    }

    fn sample(index: &IndexDescriptor, entry: &mut IndexEntry, mode: IndexSamplingMode) -> bool {
        if mode == IndexSamplingMode::RebuildUpdated && entry.updates_since_sample == 0 {
            return false;
        }
        entry.sample_count += 1;
        entry.updates_since_sample = 0;
        debug!(target: "stratagraph::db", index = ?index, mode = ?mode, "Index sampled");
        true
    }
}

impl IndexingService for Database {
    fn await_index_online(&self, index: &IndexDescriptor, timeout: Duration) -> GraphResult<()> {
        self.await_readiness(
            || {
                let store = self.shared.store.read();
                index.schema.user_description(&*store)
            },
            timeout,
            || self.index_readiness(index),
        )
    }

    fn await_all_online(&self, timeout: Duration) -> GraphResult<()> {
        self.await_readiness(
            || "all indexes to come online".to_string(),
            timeout,
            || self.all_readiness(),
        )
    }

    fn trigger_sampling(&self, index: &IndexDescriptor, mode: IndexSamplingMode) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        let description = index.user_description(&*store);
        let entry = store
            .indexes
            .get_mut(index)
            .ok_or(GraphError::IndexNotFound { index: description })?;
        Self::sample(index, entry, mode);
        Ok(())
    }

    fn trigger_sampling_all(&self, mode: IndexSamplingMode) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        let mut sampled = 0usize;
        for (descriptor, entry) in store.indexes.iter_mut() {
            if Self::sample(descriptor, entry, mode) {
                sampled += 1;
            }
        }
        debug!(target: "stratagraph::db", sampled, mode = ?mode, "Sampling triggered");
        Ok(())
    }
}
