mod error;
mod path;
mod traits;

pub mod filesystem;
pub mod memory;

pub use error::StorageError;
pub use path::{ObjectPath, validate_segment};
pub use traits::BlobStore;
