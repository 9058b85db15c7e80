//! Chart of accounts and import reconciliation.
//!
//! - `types` - accounts and account types
//! - `index` - case-insensitive lookup by code and id
//! - `import_row` - typed view of an uploaded row
//! - `reconcile` - add/update/unchanged/remove classification
//! - `parents` - second-pass parent resolution with cycle detection
//! - `chart` - in-memory application of a plan

pub mod chart;
pub mod error;
pub mod import_row;
pub mod index;
pub mod parents;
pub mod reconcile;
pub mod types;
pub mod warning;

#[cfg(test)]
mod parents_props;

pub use chart::{ChartOfAccounts, ImportSummary};
pub use error::AccountError;
pub use import_row::AccountImportRow;
pub use index::{ChartIndex, code_key};
pub use parents::{ParentAssignment, ParentResolution, resolve_parent_links};
pub use reconcile::{
    AccountChange, AccountFacts, ChartReconciler, ParentLink, ReconciliationPlan, RemovalMode,
};
pub use types::{Account, AccountType, AccountUpdate};
pub use warning::{ImportWarning, WarningCode};
