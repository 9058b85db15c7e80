//! Uploaded file parsing and header normalization.

pub mod error;
pub mod parse;
pub mod row;

pub use error::ImportError;
pub use parse::{UploadFormat, parse_rows};
pub use row::{ImportRow, resolve_field};
