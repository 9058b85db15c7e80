//! Dimensions, their permitted values, and line tags.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod types;

pub use catalog::{DimensionCatalog, TagLookup};
pub use error::DimensionError;
pub use filter::DimensionFilter;
pub use types::{Dimension, DimensionTag, DimensionValue, PendingDimensionValue};
