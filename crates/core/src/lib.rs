//! Core business logic for Ledgerwise.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `journal` - Double-entry lines, balance checks, entry lifecycle and reversals
//! - `accounts` - Chart of accounts and import reconciliation
//! - `dimension` - Dimension catalog, line tags and report filters
//! - `import` - Uploaded file parsing and header normalization
//! - `review` - Batch review of uploaded journal entries
//! - `reports` - Trial balance, balance sheet, income statement, consolidation
//! - `storage` - Object storage for attachment bytes
//! - `attachment` - Files attached to journal entries

pub mod accounts;
pub mod attachment;
pub mod dimension;
pub mod import;
pub mod journal;
pub mod reports;
pub mod review;
pub mod storage;
