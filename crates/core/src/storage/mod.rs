//! Object storage for attachment bytes using Apache OpenDAL.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Apache OpenDAL                 │
//! ├──────────────────────────────────────────────┤
//! │ op.write(key, bytes)  │ op.read(key)         │
//! │ op.delete(key)        │ op.stat(key)         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Production uses the local filesystem backend; tests and dry runs use the
//! in-process memory backend.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{ObjectMetadata, StorageService, sanitize_filename, storage_key};
