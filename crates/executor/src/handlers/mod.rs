//! Procedure handlers organized by category.
//!
//! | Module | Procedures | Statement use |
//! |--------|------------|---------------|
//! | `tokens` | 3 | Lease transferred into the result stream |
//! | `schema` | 3 | Lease released before returning |
//! | `indexing` | 4 | Lease held while resolving and awaiting |
//! | `legacy` | 11 | Lease transferred, or released when an automatic index is missing |
//! | `manual` | 10 | Lease only to check entity existence |

use crate::records::Record;
use crate::stream::ResultStream;
use crate::Output;

pub mod indexing;
pub mod legacy;
pub mod manual;
pub mod schema;
pub mod tokens;

/// Wrap materialized records as output
pub(crate) fn records<R>(items: Vec<R>) -> Output
where
    R: Into<Record> + Send + 'static,
{
    Output::Records(ResultStream::from_vec(items).map(Into::into))
}
