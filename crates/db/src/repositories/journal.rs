//! Journal repository for entries, their lines and dimension tags.
//!
//! Every write runs in one database transaction: an entry is stored with all
//! of its lines and tags or not at all, and a reversal voids its original in
//! the same transaction that inserts the mirror.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use ledgerwise_core::accounts::ChartIndex;
use ledgerwise_core::dimension::{DimensionCatalog, DimensionTag};
use ledgerwise_core::journal::{
    AccountRef, ActorRole, EntryLifecycle, EntryStatus, JournalEntry, JournalError, JournalLine,
    LineAmount, ReversalBuilder, StatusChange,
};
use ledgerwise_core::reports::ReportPeriod;
use ledgerwise_shared::AppError;
use ledgerwise_shared::types::{
    AccountId, ClientId, DimensionId, DimensionValueId, EntityId, JournalEntryId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::account::list_accounts;
use super::dimension::load_catalog;
use crate::entities::{
    journal_entries, journal_entry_lines, legal_entities, line_dimension_tags,
    sea_orm_active_enums::EntryStatus as DbEntryStatus,
};

/// Statuses whose lines count towards balances.
pub(crate) const LEDGER_STATUSES: [DbEntryStatus; 2] = [DbEntryStatus::Posted, DbEntryStatus::Void];

/// Error types for journal repository operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalRepositoryError {
    /// Journal rule rejected the operation.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Entity does not exist or belongs to another client.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A line is tagged with a value that is unknown or inactive.
    #[error("Dimension value {0} is not valid for this client")]
    InvalidDimensionTag(DimensionValueId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalRepositoryError> for AppError {
    fn from(err: JournalRepositoryError) -> Self {
        match err {
            JournalRepositoryError::Journal(e) => e.into(),
            JournalRepositoryError::EntityNotFound(_) => Self::NotFound(err.to_string()),
            JournalRepositoryError::InvalidDimensionTag(_) => Self::Validation(err.to_string()),
            JournalRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A line of an account ledger listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountLedgerLine {
    /// Entry the line belongs to.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Entry reference.
    pub reference: Option<String>,
    /// Entry status, posted or void.
    pub status: EntryStatus,
    /// Signed line amount.
    pub amount: LineAmount,
    /// Line memo.
    pub memo: Option<String>,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores an entry with its lines and tags.
    ///
    /// Account codes are resolved against the client's chart. Drafts may be
    /// unbalanced; pending and posted entries must pass the balance check.
    /// A posted accrual also stores its automatic reversal.
    ///
    /// # Errors
    ///
    /// Returns an error if an account is unknown or inactive, a tag is not in
    /// the client's catalog, the entry does not balance, or the database fails.
    pub async fn create_entry(
        &self,
        entry: &JournalEntry,
    ) -> Result<JournalEntry, JournalRepositoryError> {
        let mut stored = self.create_entries(std::slice::from_ref(entry)).await?;
        stored
            .pop()
            .ok_or_else(|| JournalError::EntryNotFound(entry.id).into())
    }

    /// Stores several entries atomically.
    ///
    /// # Errors
    ///
    /// Returns the first failure; nothing is stored in that case.
    pub async fn create_entries(
        &self,
        entries: &[JournalEntry],
    ) -> Result<Vec<JournalEntry>, JournalRepositoryError> {
        let txn = self.db.begin().await?;

        let mut stored = Vec::with_capacity(entries.len());
        for entry in entries {
            let saved = insert_entry(&txn, entry, false).await?;
            if saved.status == EntryStatus::Posted {
                insert_accrual_reversal(&txn, &saved).await?;
            }
            stored.push(saved);
        }

        txn.commit().await?;

        info!(count = stored.len(), "Journal entries created");
        Ok(stored)
    }

    /// Loads an entry with its lines in order.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist for the client.
    pub async fn find_entry(
        &self,
        client_id: ClientId,
        entry_id: JournalEntryId,
    ) -> Result<JournalEntry, JournalRepositoryError> {
        load_entry(&self.db, client_id, entry_id).await
    }

    /// Lists a client's entry headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        client_id: ClientId,
        status: Option<EntryStatus>,
    ) -> Result<Vec<journal_entries::Model>, JournalRepositoryError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::ClientId.eq(client_id.into_inner()));
        if let Some(status) = status {
            query = query.filter(journal_entries::Column::Status.eq(to_db_status(status)));
        }
        Ok(query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Applies a status change decided by the lifecycle rules.
    ///
    /// The stored status must still equal `change.from`. Posting an accrual
    /// stores its automatic reversal in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the entry moved on or the transition is
    /// not allowed.
    pub async fn update_status(
        &self,
        client_id: ClientId,
        entry_id: JournalEntryId,
        change: &StatusChange,
    ) -> Result<JournalEntry, JournalRepositoryError> {
        let txn = self.db.begin().await?;

        let mut entry = load_entry(&txn, client_id, entry_id).await?;
        if entry.status != change.from
            || !EntryLifecycle::is_valid_transition(change.from, change.to)
        {
            return Err(JournalError::InvalidTransition {
                from: entry.status,
                to: change.to,
            }
            .into());
        }
        if change.to == EntryStatus::Posted {
            entry.validate_for_posting()?;
        }

        set_status(&txn, entry_id, change.to).await?;
        entry.status = change.to;
        if entry.status == EntryStatus::Posted {
            insert_accrual_reversal(&txn, &entry).await?;
        }

        txn.commit().await?;

        info!(
            entry_id = %entry_id,
            from = %change.from,
            to = %change.to,
            actor = %change.actor,
            reason = change.reason.as_deref().unwrap_or(""),
            "Journal entry status changed"
        );
        Ok(entry)
    }

    /// Submits a draft for approval, or posts it for privileged roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not a balanced draft.
    pub async fn submit(
        &self,
        client_id: ClientId,
        entry_id: JournalEntryId,
        role: ActorRole,
    ) -> Result<JournalEntry, JournalRepositoryError> {
        let entry = self.find_entry(client_id, entry_id).await?;
        let change = EntryLifecycle::submit(&entry, role)?;
        self.update_status(client_id, entry_id, &change).await
    }

    /// Approves a pending entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the role may not post or the entry is not pending.
    pub async fn approve(
        &self,
        client_id: ClientId,
        entry_id: JournalEntryId,
        role: ActorRole,
    ) -> Result<JournalEntry, JournalRepositoryError> {
        let entry = self.find_entry(client_id, entry_id).await?;
        let change = EntryLifecycle::approve(&entry, role)?;
        self.update_status(client_id, entry_id, &change).await
    }

    /// Sends a pending entry back to draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is blank, the role may not post, or the
    /// entry is not pending.
    pub async fn reject(
        &self,
        client_id: ClientId,
        entry_id: JournalEntryId,
        role: ActorRole,
        reason: &str,
    ) -> Result<JournalEntry, JournalRepositoryError> {
        let entry = self.find_entry(client_id, entry_id).await?;
        let change = EntryLifecycle::reject(&entry, role, reason)?;
        self.update_status(client_id, entry_id, &change).await
    }

    /// Deletes a draft entry together with its lines.
    ///
    /// # Errors
    ///
    /// Returns `CanOnlyDeleteDraft` for any other status.
    pub async fn delete_draft(
        &self,
        client_id: ClientId,
        entry_id: JournalEntryId,
    ) -> Result<(), JournalRepositoryError> {
        let header = find_header(&self.db, client_id, entry_id).await?;
        EntryLifecycle::ensure_deletable(from_db_status(header.status))?;

        journal_entries::Entity::delete_by_id(header.id)
            .exec(&self.db)
            .await?;

        info!(entry_id = %entry_id, "Draft journal entry deleted");
        Ok(())
    }

    /// Reverses a posted entry.
    ///
    /// The mirror entry is inserted as posted and the original becomes void,
    /// atomically. Returns the mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not posted or the date precedes it.
    pub async fn reverse_entry(
        &self,
        client_id: ClientId,
        entry_id: JournalEntryId,
        reversal_date: NaiveDate,
    ) -> Result<JournalEntry, JournalRepositoryError> {
        let txn = self.db.begin().await?;

        let original = load_entry(&txn, client_id, entry_id).await?;
        let reversal = ReversalBuilder::reverse(&original, reversal_date)?;
        let mirror = insert_entry(&txn, &reversal.reversing_entry, true).await?;
        set_status(&txn, reversal.original_id, EntryStatus::Void).await?;

        txn.commit().await?;

        info!(
            entry_id = %entry_id,
            reversal_id = %mirror.id,
            %reversal_date,
            "Journal entry reversed"
        );
        Ok(mirror)
    }

    /// Lists the ledger lines of one account in `period`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lines_for_account(
        &self,
        client_id: ClientId,
        account_id: AccountId,
        period: &ReportPeriod,
    ) -> Result<Vec<AccountLedgerLine>, JournalRepositoryError> {
        let mut query = journal_entry_lines::Entity::find()
            .find_also_related(journal_entries::Entity)
            .filter(journal_entry_lines::Column::AccountId.eq(account_id.into_inner()))
            .filter(journal_entries::Column::ClientId.eq(client_id.into_inner()))
            .filter(journal_entries::Column::Status.is_in(LEDGER_STATUSES))
            .filter(journal_entries::Column::EntryDate.lte(period.end));
        if let Some(start) = period.start {
            query = query.filter(journal_entries::Column::EntryDate.gte(start));
        }
        let rows = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::CreatedAt)
            .order_by_asc(journal_entry_lines::Column::LineNo)
            .all(&self.db)
            .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for (line, entry) in rows {
            let Some(entry) = entry else { continue };
            lines.push(AccountLedgerLine {
                entry_id: JournalEntryId::from_uuid(entry.id),
                entry_date: entry.entry_date,
                description: entry.description,
                reference: entry.reference,
                status: from_db_status(entry.status),
                amount: LineAmount::try_from_sides(line.debit, line.credit)?,
                memo: line.memo,
            });
        }
        Ok(lines)
    }
}

/// Inserts an entry inside `txn`, returning it with account ids resolved.
async fn insert_entry(
    txn: &DatabaseTransaction,
    entry: &JournalEntry,
    allow_inactive: bool,
) -> Result<JournalEntry, JournalRepositoryError> {
    let owned = legal_entities::Entity::find_by_id(entry.entity_id.into_inner())
        .filter(legal_entities::Column::ClientId.eq(entry.client_id.into_inner()))
        .count(txn)
        .await?;
    if owned == 0 {
        return Err(JournalRepositoryError::EntityNotFound(entry.entity_id));
    }

    let chart = ChartIndex::new(list_accounts(txn, entry.client_id).await?);
    let catalog = load_catalog(txn, entry.client_id).await?;
    let lines = resolve_lines(&chart, &catalog, &entry.lines, allow_inactive)?;

    let stored = JournalEntry {
        lines,
        ..entry.clone()
    };
    stored.ensure_has_lines()?;
    match stored.status {
        EntryStatus::Posted => {
            stored.validate_for_posting()?;
        }
        EntryStatus::PendingApproval => stored.balance().ensure_postable()?,
        EntryStatus::Draft | EntryStatus::Void => {}
    }

    let now = Utc::now().into();
    journal_entries::ActiveModel {
        id: Set(stored.id.into_inner()),
        client_id: Set(stored.client_id.into_inner()),
        entity_id: Set(stored.entity_id.into_inner()),
        entry_date: Set(stored.entry_date),
        description: Set(stored.description.clone()),
        reference: Set(stored.reference.clone()),
        is_accrual: Set(stored.is_accrual),
        reversal_date: Set(stored.reversal_date),
        status: Set(to_db_status(stored.status)),
        reversal_of: Set(stored.reversal_of.map(JournalEntryId::into_inner)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    for (line_no, line) in (1_i32..).zip(&stored.lines) {
        let line_id = Uuid::now_v7();
        let AccountRef::Id(account_id) = &line.account else {
            return Err(JournalError::AccountNotFound(describe(&line.account)).into());
        };
        journal_entry_lines::ActiveModel {
            id: Set(line_id),
            journal_entry_id: Set(stored.id.into_inner()),
            line_no: Set(line_no),
            account_id: Set(account_id.into_inner()),
            entity_code: Set(line.entity_code.clone()),
            debit: Set(line.debit()),
            credit: Set(line.credit()),
            memo: Set(line.memo.clone()),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;

        for tag in &line.dimensions {
            line_dimension_tags::ActiveModel {
                line_id: Set(line_id),
                dimension_value_id: Set(tag.dimension_value_id.into_inner()),
                dimension_id: Set(tag.dimension_id.into_inner()),
            }
            .insert(txn)
            .await?;
        }
    }

    debug!(
        entry_id = %stored.id,
        status = %stored.status,
        lines = stored.lines.len(),
        "Journal entry inserted"
    );
    Ok(stored)
}

/// Stores the automatic reversal of a posted accrual, if any.
async fn insert_accrual_reversal(
    txn: &DatabaseTransaction,
    entry: &JournalEntry,
) -> Result<(), JournalRepositoryError> {
    if let Some(reversal) = ReversalBuilder::accrual_reversal(entry)? {
        insert_entry(txn, &reversal, true).await?;
        info!(
            entry_id = %entry.id,
            reversal_id = %reversal.id,
            "Accrual reversal scheduled"
        );
    }
    Ok(())
}

/// Resolves account references and checks tags against the catalog.
fn resolve_lines(
    chart: &ChartIndex,
    catalog: &DimensionCatalog,
    lines: &[JournalLine],
    allow_inactive: bool,
) -> Result<Vec<JournalLine>, JournalRepositoryError> {
    lines
        .iter()
        .map(|line| {
            let account = chart
                .resolve(&line.account)
                .ok_or_else(|| JournalError::AccountNotFound(describe(&line.account)))?;
            if !account.is_active && !allow_inactive {
                return Err(JournalError::AccountInactive(account.id).into());
            }
            if let Some(tag) = line.dimensions.iter().find(|t| !catalog.is_valid_tag(t)) {
                return Err(JournalRepositoryError::InvalidDimensionTag(
                    tag.dimension_value_id,
                ));
            }
            Ok(JournalLine {
                account: AccountRef::Id(account.id),
                ..line.clone()
            })
        })
        .collect()
}

fn describe(account: &AccountRef) -> String {
    match account {
        AccountRef::Id(id) => id.to_string(),
        AccountRef::Code(code) => code.clone(),
    }
}

async fn find_header<C: ConnectionTrait>(
    db: &C,
    client_id: ClientId,
    entry_id: JournalEntryId,
) -> Result<journal_entries::Model, JournalRepositoryError> {
    journal_entries::Entity::find_by_id(entry_id.into_inner())
        .filter(journal_entries::Column::ClientId.eq(client_id.into_inner()))
        .one(db)
        .await?
        .ok_or_else(|| JournalError::EntryNotFound(entry_id).into())
}

async fn load_entry<C: ConnectionTrait>(
    db: &C,
    client_id: ClientId,
    entry_id: JournalEntryId,
) -> Result<JournalEntry, JournalRepositoryError> {
    let header = find_header(db, client_id, entry_id).await?;

    let line_models = journal_entry_lines::Entity::find()
        .filter(journal_entry_lines::Column::JournalEntryId.eq(header.id))
        .order_by_asc(journal_entry_lines::Column::LineNo)
        .all(db)
        .await?;
    let line_ids: Vec<Uuid> = line_models.iter().map(|l| l.id).collect();
    let tags = load_tags(db, client_id, &line_ids).await?;

    let mut lines = Vec::with_capacity(line_models.len());
    for model in line_models {
        lines.push(JournalLine {
            account: AccountRef::Id(AccountId::from_uuid(model.account_id)),
            entity_code: model.entity_code,
            amount: LineAmount::try_from_sides(model.debit, model.credit)?,
            memo: model.memo,
            dimensions: tags.get(&model.id).cloned().unwrap_or_default(),
        });
    }

    Ok(JournalEntry {
        id: JournalEntryId::from_uuid(header.id),
        client_id: ClientId::from_uuid(header.client_id),
        entity_id: EntityId::from_uuid(header.entity_id),
        entry_date: header.entry_date,
        description: header.description,
        reference: header.reference,
        is_accrual: header.is_accrual,
        reversal_date: header.reversal_date,
        status: from_db_status(header.status),
        reversal_of: header.reversal_of.map(JournalEntryId::from_uuid),
        lines,
    })
}

/// Loads the tags of the given lines, named from the client's catalog.
pub(crate) async fn load_tags<C: ConnectionTrait>(
    db: &C,
    client_id: ClientId,
    line_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<DimensionTag>>, DbErr> {
    let mut by_line: HashMap<Uuid, Vec<DimensionTag>> = HashMap::new();
    if line_ids.is_empty() {
        return Ok(by_line);
    }

    let catalog = load_catalog(db, client_id).await?;
    let models = line_dimension_tags::Entity::find()
        .filter(line_dimension_tags::Column::LineId.is_in(line_ids.iter().copied()))
        .all(db)
        .await?;
    for model in models {
        let dimension_id = DimensionId::from_uuid(model.dimension_id);
        let value_id = DimensionValueId::from_uuid(model.dimension_value_id);
        let dimension_name = catalog
            .dimension(dimension_id)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        let value_name = catalog
            .values_of(dimension_id)
            .find(|v| v.id == value_id)
            .map(|v| v.name.clone())
            .unwrap_or_default();
        by_line.entry(model.line_id).or_default().push(DimensionTag {
            dimension_id,
            dimension_value_id: value_id,
            dimension_name,
            value_name,
        });
    }
    Ok(by_line)
}

async fn set_status(
    txn: &DatabaseTransaction,
    entry_id: JournalEntryId,
    status: EntryStatus,
) -> Result<(), DbErr> {
    journal_entries::ActiveModel {
        id: Set(entry_id.into_inner()),
        status: Set(to_db_status(status)),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .update(txn)
    .await?;
    Ok(())
}

/// Maps a domain status onto the database enum.
pub(crate) const fn to_db_status(status: EntryStatus) -> DbEntryStatus {
    match status {
        EntryStatus::Draft => DbEntryStatus::Draft,
        EntryStatus::PendingApproval => DbEntryStatus::PendingApproval,
        EntryStatus::Posted => DbEntryStatus::Posted,
        EntryStatus::Void => DbEntryStatus::Void,
    }
}

/// Maps a database status onto the domain enum.
pub(crate) const fn from_db_status(status: DbEntryStatus) -> EntryStatus {
    match status {
        DbEntryStatus::Draft => EntryStatus::Draft,
        DbEntryStatus::PendingApproval => EntryStatus::PendingApproval,
        DbEntryStatus::Posted => EntryStatus::Posted,
        DbEntryStatus::Void => EntryStatus::Void,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerwise_core::accounts::{Account, AccountType};
    use ledgerwise_core::dimension::{Dimension, DimensionValue};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn account(code: &str, is_active: bool) -> Account {
        Account {
            id: AccountId::new(),
            client_id: ClientId::new(),
            code: code.into(),
            name: format!("Account {code}"),
            account_type: AccountType::Asset,
            subtype: None,
            description: None,
            parent_id: None,
            is_active,
        }
    }

    fn catalog() -> (DimensionCatalog, DimensionTag) {
        let dimension = Dimension {
            id: DimensionId::new(),
            client_id: ClientId::new(),
            code: "DEPT".into(),
            name: "Department".into(),
            is_active: true,
        };
        let value = DimensionValue {
            id: DimensionValueId::new(),
            dimension_id: dimension.id,
            code: None,
            name: "Sales".into(),
            is_active: true,
        };
        let tag = DimensionTag {
            dimension_id: dimension.id,
            dimension_value_id: value.id,
            dimension_name: dimension.name.clone(),
            value_name: value.name.clone(),
        };
        (DimensionCatalog::new(vec![dimension], vec![value]), tag)
    }

    #[rstest]
    #[case(EntryStatus::Draft)]
    #[case(EntryStatus::PendingApproval)]
    #[case(EntryStatus::Posted)]
    #[case(EntryStatus::Void)]
    fn test_status_mapping_round_trips(#[case] status: EntryStatus) {
        assert_eq!(from_db_status(to_db_status(status)), status);
    }

    #[test]
    fn test_resolve_lines_by_code() {
        let cash = account("1000", true);
        let chart = ChartIndex::new(vec![cash.clone()]);
        let (catalog, tag) = catalog();
        let mut line = JournalLine::new(AccountRef::Code("1000".into()), "", LineAmount::debit(dec!(5)));
        line.dimensions.push(tag);

        let lines = resolve_lines(&chart, &catalog, &[line], false).unwrap();
        assert_eq!(lines[0].account, AccountRef::Id(cash.id));
        assert_eq!(lines[0].dimensions.len(), 1);
    }

    #[test]
    fn test_resolve_lines_unknown_account() {
        let chart = ChartIndex::new(vec![account("1000", true)]);
        let (catalog, _) = catalog();
        let line = JournalLine::new(AccountRef::Code("9999".into()), "", LineAmount::debit(dec!(5)));

        let err = resolve_lines(&chart, &catalog, &[line], false).unwrap_err();
        assert!(matches!(
            err,
            JournalRepositoryError::Journal(JournalError::AccountNotFound(code)) if code == "9999"
        ));
    }

    #[test]
    fn test_resolve_lines_inactive_account() {
        let closed = account("1500", false);
        let chart = ChartIndex::new(vec![closed.clone()]);
        let (catalog, _) = catalog();
        let line = JournalLine::new(AccountRef::Id(closed.id), "", LineAmount::credit(dec!(5)));

        let err = resolve_lines(&chart, &catalog, std::slice::from_ref(&line), false).unwrap_err();
        assert!(matches!(
            err,
            JournalRepositoryError::Journal(JournalError::AccountInactive(id)) if id == closed.id
        ));
        assert!(resolve_lines(&chart, &catalog, &[line], true).is_ok());
    }

    #[test]
    fn test_resolve_lines_rejects_foreign_tag() {
        let chart = ChartIndex::new(vec![account("1000", true)]);
        let (catalog, mut tag) = catalog();
        tag.dimension_value_id = DimensionValueId::new();
        let mut line = JournalLine::new(AccountRef::Code("1000".into()), "", LineAmount::debit(dec!(5)));
        line.dimensions.push(tag.clone());

        let err = resolve_lines(&chart, &catalog, &[line], false).unwrap_err();
        assert!(matches!(
            err,
            JournalRepositoryError::InvalidDimensionTag(id) if id == tag.dimension_value_id
        ));
    }

    #[test]
    fn test_error_mapping() {
        let err: AppError = JournalRepositoryError::EntityNotFound(EntityId::new()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = JournalRepositoryError::Journal(JournalError::CanOnlyDeleteDraft).into();
        assert!(!matches!(err, AppError::Database(_)));
    }
}
