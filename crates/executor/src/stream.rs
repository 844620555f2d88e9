//! Lazy result streams
//!
//! A [`ResultStream`] is a single-pass iterator of `Result<T>`. Streams built
//! with [`ResultStream::leased`] own a [`StatementLease`]: items are mapped
//! through the leased statement only when pulled, and the lease is released
//! the moment the source runs dry, when the stream is closed, or when it is
//! dropped part way through. After exhaustion the stream stays exhausted.

use std::fmt;

use stratagraph_core::ReadOperations;

use crate::lease::StatementLease;
use crate::Result;

/// Lazily produced procedure results
pub struct ResultStream<T> {
    inner: Box<dyn Iterator<Item = Result<T>> + Send>,
}

impl<T: Send + 'static> ResultStream<T> {
    /// A stream with no items
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// A stream over already materialized items
    pub fn from_vec(items: Vec<T>) -> Self {
        ResultStream {
            inner: Box::new(items.into_iter().map(Ok)),
        }
    }

    /// A stream that owns `lease` and maps each item of `source` through
    /// the leased statement when it is pulled.
    ///
    /// A mapper failure is yielded in place of that item; iteration may
    /// continue past it.
    pub fn leased<I, F>(lease: StatementLease, source: I, mapper: F) -> Self
    where
        I: Iterator + Send + 'static,
        F: FnMut(&dyn ReadOperations, I::Item) -> Result<T> + Send + 'static,
    {
        ResultStream {
            inner: Box::new(Leased {
                source,
                lease: Some(lease),
                mapper,
            }),
        }
    }

    /// Transform each successful item
    pub fn map<U, F>(self, mut f: F) -> ResultStream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        ResultStream {
            inner: Box::new(self.inner.map(move |item| item.map(&mut f))),
        }
    }

    /// Drain the stream, stopping at the first failure
    pub fn collect_all(self) -> Result<Vec<T>> {
        self.collect()
    }

    /// Stop consuming and release whatever the stream holds
    pub fn close(self) {}
}

impl<T> Iterator for ResultStream<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<T> fmt::Debug for ResultStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultStream").finish_non_exhaustive()
    }
}

// Field order is drop order: the source cursor goes before its statement.
struct Leased<I, F> {
    source: I,
    lease: Option<StatementLease>,
    mapper: F,
}

impl<I, F, T> Iterator for Leased<I, F>
where
    I: Iterator,
    F: FnMut(&dyn ReadOperations, I::Item) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        let lease = self.lease.as_ref()?;
        match self.source.next() {
            Some(item) => Some(lease.read().and_then(|read| (self.mapper)(read, item))),
            None => {
                if let Some(lease) = self.lease.take() {
                    lease.close();
                }
                None
            }
        }
    }
}
