//! Interactive review of an uploaded journal batch.

use std::cmp::Reverse;

use ledgerwise_shared::types::{ClientId, EntityId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::accounts::ChartIndex;
use crate::dimension::{DimensionCatalog, DimensionValue, PendingDimensionValue};
use crate::import::{ImportRow, parse_rows};
use crate::journal::JournalEntry;

use super::error::ReviewError;
use super::grouping::group_rows;
use super::types::{EntryGroup, GroupKey, GroupState, SuggestionKind};
use super::validate::{build_entry, validate_all, validate_group};

/// Which groups a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupFilter {
    /// Every group.
    #[default]
    All,
    /// Valid groups only.
    Valid,
    /// Groups with errors.
    Invalid,
    /// Selected groups.
    Selected,
}

impl GroupFilter {
    fn matches(self, group: &EntryGroup) -> bool {
        match self {
            Self::All => true,
            Self::Valid => group.is_valid(),
            Self::Invalid => !group.is_valid(),
            Self::Selected => group.selected,
        }
    }
}

/// Display order of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSort {
    /// Order of first appearance in the file.
    #[default]
    FileOrder,
    /// Oldest entry date first; undated groups last.
    DateAsc,
    /// Newest entry date first; undated groups last.
    DateDesc,
    /// Groups with errors first.
    InvalidFirst,
}

/// Counts over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Number of groups.
    pub total: usize,
    /// Groups without errors.
    pub valid: usize,
    /// Groups with errors.
    pub invalid: usize,
    /// Groups that would be committed now.
    pub eligible: usize,
    /// Groups already committed.
    pub committed: usize,
}

/// Entries ready to persist, with the groups they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitBatch {
    /// Draft entries, one per eligible group.
    pub entries: Vec<JournalEntry>,
    /// Keys of the groups in `entries`, same order.
    pub keys: Vec<GroupKey>,
    /// Uncommitted groups left out.
    pub skipped: usize,
}

impl CommitBatch {
    /// True if nothing would be committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A batch under review: groups plus the lookups they validate against.
///
/// Selection lives on each group and is addressed by [`GroupKey`], so
/// filtering and sorting never change what is selected.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    client_id: ClientId,
    entity_id: EntityId,
    groups: Vec<EntryGroup>,
    chart: ChartIndex,
    catalog: DimensionCatalog,
}

impl ReviewSession {
    /// Groups and validates parsed rows.
    #[must_use]
    pub fn new(
        client_id: ClientId,
        entity_id: EntityId,
        rows: Vec<ImportRow>,
        chart: ChartIndex,
        catalog: DimensionCatalog,
    ) -> Self {
        let mut groups = group_rows(rows);
        validate_all(&mut groups, &chart, &catalog);
        info!(
            client_id = %client_id,
            entity_id = %entity_id,
            groups = groups.len(),
            "Review session opened"
        );
        Self {
            client_id,
            entity_id,
            groups,
            chart,
            catalog,
        }
    }

    /// Parses an uploaded file and opens a session over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed.
    pub fn from_upload(
        client_id: ClientId,
        entity_id: EntityId,
        bytes: &[u8],
        filename: &str,
        delimiter: u8,
        chart: ChartIndex,
        catalog: DimensionCatalog,
    ) -> Result<Self, ReviewError> {
        let rows = parse_rows(bytes, filename, delimiter)?;
        Ok(Self::new(client_id, entity_id, rows, chart, catalog))
    }

    /// All groups in file order.
    #[must_use]
    pub fn groups(&self) -> &[EntryGroup] {
        &self.groups
    }

    /// Dimension lookups, including values approved during the session.
    #[must_use]
    pub fn catalog(&self) -> &DimensionCatalog {
        &self.catalog
    }

    /// Group by key.
    ///
    /// # Errors
    ///
    /// Returns an error if no group has the key.
    pub fn group(&self, key: &GroupKey) -> Result<&EntryGroup, ReviewError> {
        self.groups
            .iter()
            .find(|g| &g.key == key)
            .ok_or_else(|| ReviewError::GroupNotFound(key.to_string()))
    }

    fn position(&self, key: &GroupKey) -> Result<usize, ReviewError> {
        self.groups
            .iter()
            .position(|g| &g.key == key)
            .ok_or_else(|| ReviewError::GroupNotFound(key.to_string()))
    }

    fn editable(&self, key: &GroupKey) -> Result<usize, ReviewError> {
        let idx = self.position(key)?;
        if self.groups[idx].state == GroupState::Committed {
            return Err(ReviewError::AlreadyCommitted(key.to_string()));
        }
        Ok(idx)
    }

    fn revalidate(&mut self, idx: usize) {
        let group = &mut self.groups[idx];
        let validation = validate_group(group, &self.chart, &self.catalog);
        debug!(
            group = %group.key,
            is_valid = validation.is_valid,
            errors = validation.errors.len(),
            "Group revalidated"
        );
        group.validation = Some(validation);
        group.state = GroupState::Revalidated;
    }

    /// Sets one cell and re-validates that group only.
    ///
    /// `field` may be a canonical name (`accountCode`) or the column's own
    /// header; an unknown field adds a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the group or row does not exist, or the group is
    /// committed.
    pub fn edit_cell(
        &mut self,
        key: &GroupKey,
        row_number: usize,
        field: &str,
        value: &str,
    ) -> Result<&EntryGroup, ReviewError> {
        let idx = self.editable(key)?;
        let row = self.groups[idx]
            .rows
            .iter_mut()
            .find(|r| r.row_number == row_number)
            .ok_or_else(|| ReviewError::RowNotFound {
                key: key.to_string(),
                row: row_number,
            })?;
        let header = row.header_for(field).unwrap_or(field).to_string();
        row.set(&header, value);

        self.revalidate(idx);
        Ok(&self.groups[idx])
    }

    /// Applies a suggestion's action.
    ///
    /// Cell edits re-validate the group; approving a value re-validates
    /// every group waiting on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the suggestion does not exist or its payload is
    /// malformed, or the approval fails.
    pub fn accept_suggestion(
        &mut self,
        key: &GroupKey,
        suggestion_id: usize,
    ) -> Result<&EntryGroup, ReviewError> {
        let idx = self.editable(key)?;
        let suggestion = self.groups[idx]
            .validation
            .as_ref()
            .and_then(|v| v.suggestions.iter().find(|s| s.id == suggestion_id))
            .cloned()
            .ok_or_else(|| ReviewError::SuggestionNotFound {
                key: key.to_string(),
                id: suggestion_id,
            })?;
        let payload = &suggestion.action.payload;

        match suggestion.action.kind {
            SuggestionKind::ChangeAccountCode | SuggestionKind::SetDimensionValue => {
                let value = payload["value"]
                    .as_str()
                    .ok_or_else(|| ReviewError::InvalidSuggestion("missing value".into()))?;
                let field = payload["field"].as_str().unwrap_or(&suggestion.field);
                self.edit_cell(key, suggestion.row, field, value)?;
            }
            SuggestionKind::CreateDimensionValue => {
                let pending: PendingDimensionValue = serde_json::from_value(serde_json::json!({
                    "dimension_id": payload["dimensionId"],
                    "dimension_name": payload["dimensionName"],
                    "value_name": payload["value"],
                }))
                .map_err(|e| ReviewError::InvalidSuggestion(e.to_string()))?;
                self.approve_dimension_value(&pending)?;
            }
        }
        Ok(&self.groups[idx])
    }

    /// Approves a new dimension value and re-validates the groups that
    /// referenced it.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog rejects the value.
    pub fn approve_dimension_value(
        &mut self,
        pending: &PendingDimensionValue,
    ) -> Result<DimensionValue, ReviewError> {
        let value = self.catalog.approve_value(pending)?;
        let waiting: Vec<usize> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.state != GroupState::Committed)
            .filter(|(_, g)| {
                g.validation.as_ref().is_some_and(|v| {
                    v.pending_values.iter().any(|p| {
                        p.dimension_id == pending.dimension_id
                            && p.value_name.eq_ignore_ascii_case(value.name.as_str())
                    })
                })
            })
            .map(|(idx, _)| idx)
            .collect();
        for &idx in &waiting {
            self.revalidate(idx);
        }
        info!(
            dimension = %pending.dimension_name,
            value = %value.name,
            groups = waiting.len(),
            "Approved dimension value"
        );
        Ok(value)
    }

    /// Sets a group's selection flag.
    ///
    /// Invalid groups may be selected; they still never commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist or is committed.
    pub fn set_selected(&mut self, key: &GroupKey, selected: bool) -> Result<(), ReviewError> {
        let idx = self.editable(key)?;
        self.groups[idx].selected = selected;
        Ok(())
    }

    /// Toggles every valid, uncommitted group the filter shows.
    ///
    /// Returns the number of groups touched.
    pub fn select_all_visible(&mut self, filter: GroupFilter, selected: bool) -> usize {
        let mut touched = 0;
        for group in &mut self.groups {
            if group.state != GroupState::Committed && group.is_valid() && filter.matches(group) {
                group.selected = selected;
                touched += 1;
            }
        }
        touched
    }

    /// Filtered, sorted view; does not change any group.
    #[must_use]
    pub fn view(&self, filter: GroupFilter, sort: GroupSort) -> Vec<&EntryGroup> {
        let mut view: Vec<&EntryGroup> = self.groups.iter().filter(|g| filter.matches(g)).collect();
        match sort {
            GroupSort::FileOrder => {}
            GroupSort::DateAsc => view.sort_by_key(|g| (g.entry_date().is_none(), g.entry_date())),
            GroupSort::DateDesc => {
                view.sort_by_key(|g| (g.entry_date().is_none(), Reverse(g.entry_date())));
            }
            GroupSort::InvalidFirst => view.sort_by_key(|g| g.is_valid()),
        }
        view
    }

    /// Counts for display.
    #[must_use]
    pub fn summary(&self) -> ReviewSummary {
        let valid = self.groups.iter().filter(|g| g.is_valid()).count();
        ReviewSummary {
            total: self.groups.len(),
            valid,
            invalid: self.groups.len() - valid,
            eligible: self.groups.iter().filter(|g| g.is_commit_eligible()).count(),
            committed: self
                .groups
                .iter()
                .filter(|g| g.state == GroupState::Committed)
                .count(),
        }
    }

    /// Drafts for every commit-eligible group, without changing state.
    ///
    /// Persist the batch, then call [`Self::mark_committed`] with its keys.
    #[must_use]
    pub fn prepare_commit(&self) -> CommitBatch {
        let mut batch = CommitBatch::default();
        for group in self.groups.iter().filter(|g| g.state != GroupState::Committed) {
            let entry = group
                .is_commit_eligible()
                .then(|| build_entry(group, &self.chart, &self.catalog, self.client_id, self.entity_id))
                .flatten();
            match entry {
                Some(entry) => {
                    batch.entries.push(entry);
                    batch.keys.push(group.key.clone());
                }
                None => batch.skipped += 1,
            }
        }
        batch
    }

    /// Marks groups committed after their entries were persisted.
    pub fn mark_committed(&mut self, keys: &[GroupKey]) {
        for group in &mut self.groups {
            if keys.contains(&group.key) {
                group.state = GroupState::Committed;
            }
        }
        info!(
            client_id = %self.client_id,
            committed = keys.len(),
            "Review groups committed"
        );
    }

    /// Builds drafts for eligible groups and marks them committed.
    pub fn commit_batch(&mut self) -> CommitBatch {
        let batch = self.prepare_commit();
        if batch.skipped > 0 {
            warn!(skipped = batch.skipped, "Groups left out of commit");
        }
        self.mark_committed(&batch.keys);
        batch
    }
}
