//! Pure validation of entry groups.
//!
//! `validate_group` depends only on its arguments, so edits re-run it for a
//! single group and batches fan it out across threads.

use ledgerwise_shared::types::{ClientId, EntityId, JournalEntryId};
use rayon::prelude::*;
use tracing::debug;

use crate::accounts::ChartIndex;
use crate::dimension::{DimensionCatalog, DimensionTag, TagLookup};
use crate::import::{ImportRow, resolve_field};
use crate::journal::{
    AccountRef, AmountCell, BalanceStatus, EntryBalance, EntryStatus, JournalEntry, JournalLine,
    WireLineAmount, parse_amount, try_parse_amount,
};

use super::suggest::{
    change_account_code, closest_account, closest_value, create_dimension_value,
    set_dimension_value,
};
use super::types::{
    EntryGroup, FieldError, FieldErrorCode, GroupState, GroupValidation, ReviewWarning,
    Suggestion, SuggestionAction, parse_date,
};

/// Canonical fields of a journal entry upload.
const ENTRY_FIELDS: [&str; 10] = [
    "entryDate",
    "reference",
    "description",
    "accountCode",
    "entityCode",
    "debit",
    "credit",
    "entryType",
    "amount",
    "memo",
];

const DIMENSION_PREFIXES: [&str; 2] = ["dim:", "dimension:"];

/// A dimension column found in a row.
struct DimensionCell<'a> {
    header: &'a str,
    label: &'a str,
    value: &'a str,
    explicit: bool,
}

fn dimension_cells<'a>(row: &'a ImportRow, catalog: &DimensionCatalog) -> Vec<DimensionCell<'a>> {
    let claimed: Vec<&str> = ENTRY_FIELDS
        .iter()
        .filter_map(|field| row.header_for(field))
        .collect();

    row.cells
        .iter()
        .filter(|(header, value)| !value.trim().is_empty() && !claimed.contains(&header.as_str()))
        .filter_map(|(header, value)| {
            let trimmed = header.trim();
            let lower = trimmed.to_lowercase();
            let prefixed = DIMENSION_PREFIXES
                .iter()
                .find(|p| lower.starts_with(**p))
                .and_then(|p| trimmed.get(p.len()..))
                .map(str::trim);
            match prefixed {
                Some(label) => Some(DimensionCell {
                    header,
                    label,
                    value: value.trim(),
                    explicit: true,
                }),
                None => catalog.find_dimension(trimmed).map(|_| DimensionCell {
                    header,
                    label: trimmed,
                    value: value.trim(),
                    explicit: false,
                }),
            }
        })
        .collect()
}

fn wire_amount(row: &ImportRow) -> WireLineAmount {
    let cell = |field| resolve_field(row, field).map(|v| AmountCell::Text(v.to_string()));
    WireLineAmount {
        debit: cell("debit"),
        credit: cell("credit"),
        entry_type: resolve_field(row, "entryType").map(ToString::to_string),
        amount: cell("amount"),
    }
}

/// Lines plus validation; shared by validation and commit.
struct Analysis {
    lines: Vec<JournalLine>,
    validation: GroupValidation,
}

fn suggest(
    suggestions: &mut Vec<Suggestion>,
    row: usize,
    field: &str,
    message: String,
    action: SuggestionAction,
) {
    suggestions.push(Suggestion {
        id: suggestions.len(),
        row,
        field: field.to_string(),
        message,
        action,
    });
}

fn error(row: Option<usize>, field: &str, code: FieldErrorCode, message: String) -> FieldError {
    FieldError {
        row,
        field: field.to_string(),
        code,
        message,
    }
}

#[allow(clippy::too_many_lines)]
fn analyze(group: &EntryGroup, chart: &ChartIndex, catalog: &DimensionCatalog) -> Analysis {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions: Vec<Suggestion> = Vec::new();
    let mut pending_values = Vec::new();
    let mut lines = Vec::with_capacity(group.rows.len());

    let first_row = group.rows.first().map(|r| r.row_number);
    match group
        .rows
        .iter()
        .find_map(|r| resolve_field(r, "entryDate").map(|d| (r.row_number, d)))
    {
        None => errors.push(error(
            first_row,
            "entryDate",
            FieldErrorCode::MissingDate,
            "Entry date is missing".into(),
        )),
        Some((row, raw)) if parse_date(raw).is_none() => errors.push(error(
            Some(row),
            "entryDate",
            FieldErrorCode::InvalidDate,
            format!("'{raw}' is not a date"),
        )),
        Some(_) => {}
    }

    for row in &group.rows {
        let n = row.row_number;

        let account = match resolve_field(row, "accountCode") {
            None => {
                errors.push(error(
                    Some(n),
                    "accountCode",
                    FieldErrorCode::MissingAccount,
                    "Account code is missing".into(),
                ));
                AccountRef::Code(String::new())
            }
            Some(code) => match chart.by_code(code) {
                Some(account) if account.is_active => AccountRef::Id(account.id),
                Some(account) => {
                    errors.push(error(
                        Some(n),
                        "accountCode",
                        FieldErrorCode::InactiveAccount,
                        format!("Account {} is inactive", account.code),
                    ));
                    AccountRef::Id(account.id)
                }
                None => {
                    errors.push(error(
                        Some(n),
                        "accountCode",
                        FieldErrorCode::UnknownAccount,
                        format!("Account {code} not found"),
                    ));
                    if let Some(candidate) = closest_account(chart, code) {
                        suggest(
                            &mut suggestions,
                            n,
                            "accountCode",
                            format!("Use account {} ({})", candidate.code, candidate.name),
                            change_account_code(n, &candidate.code),
                        );
                    }
                    AccountRef::Code(code.to_string())
                }
            },
        };

        for field in ["debit", "credit", "amount"] {
            if let Some(raw) = resolve_field(row, field) {
                if try_parse_amount(raw).is_none() {
                    warnings.push(ReviewWarning {
                        row: n,
                        field: field.to_string(),
                        message: format!("'{raw}' is not a number and was read as 0"),
                    });
                }
            }
        }
        let debit = resolve_field(row, "debit").map_or_else(Default::default, parse_amount);
        let credit = resolve_field(row, "credit").map_or_else(Default::default, parse_amount);
        if !debit.is_zero() && !credit.is_zero() {
            errors.push(error(
                Some(n),
                "credit",
                FieldErrorCode::LineHasBothSides,
                format!("Line has both debit {debit} and credit {credit}"),
            ));
        }

        let mut tags: Vec<DimensionTag> = Vec::new();
        for cell in dimension_cells(row, catalog) {
            match catalog.resolve(cell.label, cell.value) {
                TagLookup::Resolved(tag) => tags.push(tag),
                TagLookup::UnknownDimension => {
                    if cell.explicit {
                        errors.push(error(
                            Some(n),
                            cell.header,
                            FieldErrorCode::UnknownDimension,
                            format!("Dimension {} not found", cell.label),
                        ));
                    }
                }
                TagLookup::UnknownValue(pending) => {
                    errors.push(error(
                        Some(n),
                        cell.header,
                        FieldErrorCode::UnknownDimensionValue,
                        format!("'{}' is not a value of {}", pending.value_name, pending.dimension_name),
                    ));
                    if let Some(value) = closest_value(catalog, &pending) {
                        suggest(
                            &mut suggestions,
                            n,
                            cell.header,
                            format!("Use {} '{}'", pending.dimension_name, value.name),
                            set_dimension_value(n, cell.header, &value.name),
                        );
                    }
                    suggest(
                        &mut suggestions,
                        n,
                        cell.header,
                        format!("Create {} value '{}'", pending.dimension_name, pending.value_name),
                        create_dimension_value(&pending),
                    );
                    if !pending_values.contains(&pending) {
                        pending_values.push(pending);
                    }
                }
            }
        }

        lines.push(JournalLine {
            account,
            entity_code: resolve_field(row, "entityCode").unwrap_or_default().to_string(),
            amount: wire_amount(row).normalize(),
            memo: resolve_field(row, "memo").map(ToString::to_string),
            dimensions: tags,
        });
    }

    let balance = EntryBalance::compute(&lines);
    match balance.status() {
        BalanceStatus::Balanced => {}
        BalanceStatus::Unbalanced { difference } => errors.push(error(
            None,
            "balance",
            FieldErrorCode::Unbalanced,
            format!(
                "Debits {} and credits {} differ by {difference}",
                balance.total_debit, balance.total_credit
            ),
        )),
        BalanceStatus::IntercompanyImbalance { entities } => errors.push(error(
            None,
            "entityCode",
            FieldErrorCode::IntercompanyImbalance,
            format!("Entities out of balance: {}", entities.join(", ")),
        )),
    }
    if lines.is_empty() {
        errors.push(error(
            None,
            "lines",
            FieldErrorCode::Unbalanced,
            "Entry has no lines".into(),
        ));
    }

    let is_valid = errors.is_empty();
    Analysis {
        lines,
        validation: GroupValidation {
            errors,
            warnings,
            suggestions,
            pending_values,
            balance,
            is_valid,
        },
    }
}

/// Validates one group against the current lookups.
#[must_use]
pub fn validate_group(
    group: &EntryGroup,
    chart: &ChartIndex,
    catalog: &DimensionCatalog,
) -> GroupValidation {
    analyze(group, chart, catalog).validation
}

/// Validates every group in parallel and marks them validated.
pub fn validate_all(groups: &mut [EntryGroup], chart: &ChartIndex, catalog: &DimensionCatalog) {
    groups
        .par_iter_mut()
        .filter(|g| g.state != GroupState::Committed)
        .for_each(|group| {
            group.validation = Some(validate_group(group, chart, catalog));
            group.state = GroupState::Validated;
        });
    debug!(
        groups = groups.len(),
        valid = groups.iter().filter(|g| g.is_valid()).count(),
        "Batch validated"
    );
}

/// Builds the draft entry for a valid group.
///
/// Returns `None` if the group does not validate.
#[must_use]
pub fn build_entry(
    group: &EntryGroup,
    chart: &ChartIndex,
    catalog: &DimensionCatalog,
    client_id: ClientId,
    entity_id: EntityId,
) -> Option<JournalEntry> {
    let analysis = analyze(group, chart, catalog);
    if !analysis.validation.is_valid {
        return None;
    }
    let first = group.rows.first()?;
    let entry_date = group.entry_date()?;
    let field = |name| {
        group
            .rows
            .iter()
            .find_map(|r| resolve_field(r, name))
            .map(ToString::to_string)
    };

    Some(JournalEntry {
        id: JournalEntryId::new(),
        client_id,
        entity_id,
        entry_date,
        description: field("description").unwrap_or_else(|| format!("Imported row {}", first.row_number)),
        reference: field("reference"),
        is_accrual: false,
        reversal_date: None,
        status: EntryStatus::Draft,
        reversal_of: None,
        lines: analysis.lines,
    })
}
