//! Batch journal-entry review.
//!
//! An upload is grouped into candidate entries, each validated against the
//! chart of accounts and dimension catalog. Operators fix cells or accept
//! suggestions, which re-validates only the touched group, and commit the
//! groups that are both valid and selected.

mod error;
mod grouping;
mod session;
mod suggest;
mod types;
mod validate;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod session_props;

pub use error::ReviewError;
pub use grouping::group_rows;
pub use session::{CommitBatch, GroupFilter, GroupSort, ReviewSession, ReviewSummary};
pub use types::{
    EntryGroup, FieldError, FieldErrorCode, GroupKey, GroupState, GroupValidation, ReviewWarning,
    Suggestion, SuggestionAction, SuggestionKind, parse_date,
};
pub use validate::{build_entry, validate_all, validate_group};
