mod error;
mod query;
mod traits;

pub mod filesystem;
pub mod memory;

pub use error::DocumentError;
pub use query::{Direction, Document, Fields, Filter, FilterOp, OrderBy, Query, compare_values, encode};
pub use traits::{AUTO_ID_LEN, DocumentStore, WriteMode, merge_fields};
