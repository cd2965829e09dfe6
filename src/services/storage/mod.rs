pub mod http;
pub mod store;

pub use http::{HttpStorageClient, StorageConfig};
pub use store::{ObjectStorage, StorageError, StorageReference};
