//! Review pipeline types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dimension::PendingDimensionValue;
use crate::import::ImportRow;
use crate::journal::EntryBalance;

/// Stable identity of a group, independent of display order and edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub String);

impl GroupKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Where a group is in the review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupState {
    /// Materialized from rows, not yet checked.
    Parsed,
    /// Checked once after parsing.
    Validated,
    /// Checked again after an operator edit.
    Revalidated,
    /// Handed to persistence; no longer editable.
    Committed,
}

/// Validation failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldErrorCode {
    /// Date missing.
    MissingDate,
    /// Date unreadable.
    InvalidDate,
    /// Account code missing.
    MissingAccount,
    /// Account code matches nothing.
    UnknownAccount,
    /// Account is inactive.
    InactiveAccount,
    /// Dimension column names no dimension.
    UnknownDimension,
    /// Value outside the dimension's value set.
    UnknownDimensionValue,
    /// Debit and credit both non-zero.
    LineHasBothSides,
    /// Entry totals differ.
    Unbalanced,
    /// An entity slice does not balance.
    IntercompanyImbalance,
}

/// A blocking, field-scoped validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Source row; `None` for entry-level errors.
    pub row: Option<usize>,
    /// Canonical field name.
    pub field: String,
    /// Classification.
    pub code: FieldErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// A non-blocking note, such as an amount that read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewWarning {
    /// Source row.
    pub row: usize,
    /// Canonical field name.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// What accepting a suggestion does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Replace a row's account code.
    ChangeAccountCode,
    /// Replace a row's value for one dimension.
    SetDimensionValue,
    /// Approve creation of a new dimension value.
    CreateDimensionValue,
}

/// Actionable remediation: a kind plus its JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionAction {
    /// Action type.
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Action arguments.
    pub payload: serde_json::Value,
}

/// A heuristic fix the operator may accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Position within the group's suggestions.
    pub id: usize,
    /// Source row.
    pub row: usize,
    /// Field the suggestion fixes.
    pub field: String,
    /// Human-readable summary.
    pub message: String,
    /// What accepting it does.
    pub action: SuggestionAction,
}

/// Output of validating one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupValidation {
    /// Blocking errors.
    pub errors: Vec<FieldError>,
    /// Non-blocking warnings.
    pub warnings: Vec<ReviewWarning>,
    /// Suggested fixes.
    pub suggestions: Vec<Suggestion>,
    /// Unknown dimension values the operator could approve.
    pub pending_values: Vec<PendingDimensionValue>,
    /// Totals over the group's lines.
    pub balance: EntryBalance,
    /// True if there are no errors.
    pub is_valid: bool,
}

/// One candidate journal entry built from uploaded rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryGroup {
    /// Stable key.
    pub key: GroupKey,
    /// Source rows, edited in place.
    pub rows: Vec<ImportRow>,
    /// Review state.
    pub state: GroupState,
    /// Latest validation.
    pub validation: Option<GroupValidation>,
    /// Operator selection for commit.
    pub selected: bool,
}

impl EntryGroup {
    /// True if the latest validation passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.is_valid)
    }

    /// Commit requires both validity and operator selection.
    #[must_use]
    pub fn is_commit_eligible(&self) -> bool {
        self.is_valid() && self.selected && self.state != GroupState::Committed
    }

    /// Entry date from the first row carrying a readable one.
    #[must_use]
    pub fn entry_date(&self) -> Option<NaiveDate> {
        self.rows
            .iter()
            .find_map(|row| crate::import::resolve_field(row, "entryDate").and_then(parse_date))
    }

    /// Row by source row number.
    #[must_use]
    pub fn row(&self, row_number: usize) -> Option<&ImportRow> {
        self.rows.iter().find(|r| r.row_number == row_number)
    }
}

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y", "%d-%b-%Y"];

/// Parses the date spellings common in uploads.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
