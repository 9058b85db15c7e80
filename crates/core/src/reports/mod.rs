//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Trial Balance
//! - Balance Sheet (with current earnings in equity)
//! - Income Statement
//! - Consolidated trial balance across a group of entities

pub mod consolidation;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use consolidation::ConsolidationService;
pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
