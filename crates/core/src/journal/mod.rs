//! Double-entry journal engine.
//!
//! - `amount` - permissive amount parsing and the balance tolerance
//! - `line` - canonical signed line amount and its two wire shapes
//! - `balance` - whole-entry and per-entity balance checks
//! - `entry` - journal entry header and status
//! - `lifecycle` - role-aware state transitions
//! - `reversal` - mirror entries for reversals and accruals

pub mod amount;
pub mod balance;
pub mod entry;
pub mod error;
pub mod lifecycle;
pub mod line;
pub mod reversal;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod line_props;

pub use amount::{
    BALANCE_TOLERANCE, parse_amount, sanitize_amount, try_parse_amount, within_tolerance,
};
pub use balance::{BalanceLine, BalanceStatus, EntityBalance, EntryBalance};
pub use entry::{EntryStatus, JournalEntry};
pub use error::JournalError;
pub use lifecycle::{ActorRole, EntryLifecycle, StatusChange};
pub use line::{
    AccountRef, AmountCell, DebitCreditAmount, EntryType, JournalLine, LineAmount, TypedAmount,
    WireLineAmount, credit_of, debit_of,
};
pub use reversal::{Reversal, ReversalBuilder};
