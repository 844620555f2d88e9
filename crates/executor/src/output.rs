//! Output of procedure execution.
//!
//! A procedure either returns nothing (`void` procedures such as
//! `db.awaitIndex`) or a stream of records. The mapping is fixed per
//! procedure.

use std::fmt;

use crate::records::Record;
use crate::stream::ResultStream;
use crate::Result;

/// Successful procedure execution results.
///
/// # Example
///
/// ```text
/// use stratagraph_executor::{Output, Procedure};
///
/// match executor.execute(&tx, Procedure::Labels)? {
///     Output::Records(records) => {
///         for record in records {
///             println!("{:?}", record?);
///         }
///     }
///     Output::Unit => unreachable!("db.labels always yields records"),
/// }
/// ```
pub enum Output {
    /// No return value (await, resample)
    Unit,

    /// Lazily produced records
    Records(ResultStream<Record>),
}

impl Output {
    /// Check whether the procedure returned nothing
    pub fn is_unit(&self) -> bool {
        matches!(self, Output::Unit)
    }

    /// Records as a stream; `Unit` becomes an empty stream
    pub fn into_stream(self) -> ResultStream<Record> {
        match self {
            Output::Unit => ResultStream::empty(),
            Output::Records(records) => records,
        }
    }

    /// Drain every record, stopping at the first failure
    pub fn collect_records(self) -> Result<Vec<Record>> {
        self.into_stream().collect_all()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Unit => write!(f, "Unit"),
            Output::Records(records) => f.debug_tuple("Records").field(records).finish(),
        }
    }
}

impl From<ResultStream<Record>> for Output {
    fn from(records: ResultStream<Record>) -> Self {
        Output::Records(records)
    }
}
