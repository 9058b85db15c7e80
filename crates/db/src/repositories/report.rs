//! Report repository: loads ledger activity and feeds the report services.
//!
//! Lines of posted and void entries both count; a void entry and its posted
//! reversal cancel out, so reversed activity nets to zero in every report.

use std::collections::HashMap;

use chrono::NaiveDate;
use ledgerwise_core::dimension::DimensionFilter;
use ledgerwise_core::journal::{JournalError, LineAmount};
use ledgerwise_core::reports::{
    AccountBalance, AccountTotals, BalanceSheetReport, ConsolidatedReport, ConsolidationMember,
    ConsolidationService, IncomeStatementReport, PostedLine, ReportError, ReportPeriod,
    ReportService, TrialBalanceReport,
};
use ledgerwise_shared::AppError;
use ledgerwise_shared::types::{AccountId, ClientId, ConsolidationGroupId, EntityId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::account::list_accounts;
use super::journal::{LEDGER_STATUSES, load_tags};
use crate::entities::{
    consolidation_group_members, consolidation_groups, journal_entries, journal_entry_lines,
    legal_entities,
};

/// Error types for report repository operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportRepositoryError {
    /// Report rule rejected the request.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// A stored line carries both sides.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Consolidation group does not exist for the client.
    #[error("Consolidation group not found: {0}")]
    GroupNotFound(ConsolidationGroupId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportRepositoryError> for AppError {
    fn from(err: ReportRepositoryError) -> Self {
        match err {
            ReportRepositoryError::Report(e) => e.into(),
            ReportRepositoryError::Journal(e) => e.into(),
            ReportRepositoryError::GroupNotFound(_) => Self::NotFound(err.to_string()),
            ReportRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads ledger lines in `period`, with their tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn posted_lines(
        &self,
        client_id: ClientId,
        entity_id: Option<EntityId>,
        period: &ReportPeriod,
    ) -> Result<Vec<PostedLine>, ReportRepositoryError> {
        let rows = ledger_filter(
            journal_entry_lines::Entity::find().find_also_related(journal_entries::Entity),
            client_id,
            entity_id,
            period,
        )
        .order_by_asc(journal_entries::Column::EntryDate)
        .all(&self.db)
        .await?;

        let line_ids: Vec<Uuid> = rows.iter().map(|(line, _)| line.id).collect();
        let mut tags = load_tags(&self.db, client_id, &line_ids).await?;

        let mut lines = Vec::with_capacity(rows.len());
        for (line, entry) in rows {
            let Some(entry) = entry else { continue };
            lines.push(PostedLine {
                account_id: AccountId::from_uuid(line.account_id),
                entity_id: EntityId::from_uuid(entry.entity_id),
                entry_date: entry.entry_date,
                amount: LineAmount::try_from_sides(line.debit, line.credit)?,
                dimensions: tags.remove(&line.id).unwrap_or_default(),
            });
        }
        Ok(lines)
    }

    /// Sums ledger debits and credits per account in `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_totals(
        &self,
        client_id: ClientId,
        entity_id: Option<EntityId>,
        period: &ReportPeriod,
    ) -> Result<Vec<AccountTotals>, ReportRepositoryError> {
        let rows: Vec<(Uuid, Option<Decimal>, Option<Decimal>)> = ledger_filter(
            journal_entry_lines::Entity::find()
                .select_only()
                .column(journal_entry_lines::Column::AccountId)
                .column_as(
                    Expr::col((journal_entry_lines::Entity, journal_entry_lines::Column::Debit))
                        .sum(),
                    "total_debit",
                )
                .column_as(
                    Expr::col((journal_entry_lines::Entity, journal_entry_lines::Column::Credit))
                        .sum(),
                    "total_credit",
                )
                .join(JoinType::InnerJoin, journal_entry_lines::Relation::JournalEntries.def()),
            client_id,
            entity_id,
            period,
        )
        .group_by(journal_entry_lines::Column::AccountId)
        .into_tuple()
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(account_id, debit, credit)| AccountTotals {
                account_id: AccountId::from_uuid(account_id),
                total_debit: debit.unwrap_or_default(),
                total_credit: credit.unwrap_or_default(),
            })
            .collect())
    }

    /// Account balances in `period` passing `filter`, ordered by code.
    ///
    /// An empty filter sums in the database; a dimension filter needs the
    /// tagged lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_balances(
        &self,
        client_id: ClientId,
        entity_id: Option<EntityId>,
        period: &ReportPeriod,
        filter: &DimensionFilter,
    ) -> Result<Vec<AccountBalance>, ReportRepositoryError> {
        let chart = list_accounts(&self.db, client_id).await?;
        let balances = if filter.is_empty() {
            let totals = self.account_totals(client_id, entity_id, period).await?;
            ReportService::balances_from_totals(&chart, &totals)?
        } else {
            let lines = self.posted_lines(client_id, entity_id, period).await?;
            ReportService::balances_from_lines(&chart, &lines, period, filter)
        };
        debug!(
            client_id = %client_id,
            accounts = balances.len(),
            filtered = !filter.is_empty(),
            "Account balances loaded"
        );
        Ok(balances)
    }

    /// Trial balance for a client, or one of its entities.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trial_balance(
        &self,
        client_id: ClientId,
        entity_id: Option<EntityId>,
        period: &ReportPeriod,
        filter: &DimensionFilter,
    ) -> Result<TrialBalanceReport, ReportRepositoryError> {
        let balances = self
            .account_balances(client_id, entity_id, period, filter)
            .await?;
        Ok(ReportService::trial_balance(period.end, balances))
    }

    /// Balance sheet as of a date, cumulative since inception.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(
        &self,
        client_id: ClientId,
        entity_id: Option<EntityId>,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportRepositoryError> {
        let balances = self
            .account_balances(
                client_id,
                entity_id,
                &ReportPeriod::as_of(as_of),
                &DimensionFilter::new(),
            )
            .await?;
        Ok(ReportService::balance_sheet(as_of, balances))
    }

    /// Income statement for a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn income_statement(
        &self,
        client_id: ClientId,
        entity_id: Option<EntityId>,
        period: &ReportPeriod,
        filter: &DimensionFilter,
    ) -> Result<IncomeStatementReport, ReportRepositoryError> {
        let balances = self
            .account_balances(client_id, entity_id, period, filter)
            .await?;
        Ok(ReportService::income_statement(*period, balances))
    }

    /// Per-entity balances of a consolidation group's members.
    ///
    /// # Errors
    ///
    /// Returns `GroupNotFound` if the group belongs to another client.
    pub async fn consolidation_members(
        &self,
        client_id: ClientId,
        group_id: ConsolidationGroupId,
        as_of: NaiveDate,
    ) -> Result<Vec<ConsolidationMember>, ReportRepositoryError> {
        consolidation_groups::Entity::find_by_id(group_id.into_inner())
            .filter(consolidation_groups::Column::ClientId.eq(client_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(ReportRepositoryError::GroupNotFound(group_id))?;

        let entities: Vec<(Uuid, String)> = legal_entities::Entity::find()
            .select_only()
            .column(legal_entities::Column::Id)
            .column(legal_entities::Column::Code)
            .join(
                JoinType::InnerJoin,
                consolidation_group_members::Relation::LegalEntities.def().rev(),
            )
            .filter(consolidation_group_members::Column::GroupId.eq(group_id.into_inner()))
            .filter(legal_entities::Column::ClientId.eq(client_id.into_inner()))
            .order_by_asc(legal_entities::Column::Code)
            .into_tuple()
            .all(&self.db)
            .await?;

        let chart = list_accounts(&self.db, client_id).await?;
        let period = ReportPeriod::as_of(as_of);
        let mut members = Vec::with_capacity(entities.len());
        for (entity_id, entity_code) in entities {
            let entity_id = EntityId::from_uuid(entity_id);
            let totals = self
                .account_totals(client_id, Some(entity_id), &period)
                .await?;
            members.push(ConsolidationMember {
                entity_id,
                entity_code,
                balances: ReportService::balances_from_totals(&chart, &totals)?,
            });
        }
        Ok(members)
    }

    /// Consolidated trial balance of a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the group is unknown or has no members.
    pub async fn consolidated_trial_balance(
        &self,
        client_id: ClientId,
        group_id: ConsolidationGroupId,
        as_of: NaiveDate,
    ) -> Result<ConsolidatedReport, ReportRepositoryError> {
        let members = self
            .consolidation_members(client_id, group_id, as_of)
            .await?;
        Ok(ConsolidationService::consolidate(group_id, as_of, &members)?)
    }

    /// Entity codes of a client, keyed by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn entity_codes(
        &self,
        client_id: ClientId,
    ) -> Result<HashMap<EntityId, String>, ReportRepositoryError> {
        let rows: Vec<(Uuid, String)> = legal_entities::Entity::find()
            .select_only()
            .column(legal_entities::Column::Id)
            .column(legal_entities::Column::Code)
            .filter(legal_entities::Column::ClientId.eq(client_id.into_inner()))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, code)| (EntityId::from_uuid(id), code))
            .collect())
    }
}

/// Restricts a line query joined to its entry to ledger activity in `period`.
fn ledger_filter<Q: QueryFilter>(
    query: Q,
    client_id: ClientId,
    entity_id: Option<EntityId>,
    period: &ReportPeriod,
) -> Q {
    let mut query = query
        .filter(journal_entries::Column::ClientId.eq(client_id.into_inner()))
        .filter(journal_entries::Column::Status.is_in(LEDGER_STATUSES))
        .filter(journal_entries::Column::EntryDate.lte(period.end));
    if let Some(start) = period.start {
        query = query.filter(journal_entries::Column::EntryDate.gte(start));
    }
    if let Some(entity_id) = entity_id {
        query = query.filter(journal_entries::Column::EntityId.eq(entity_id.into_inner()));
    }
    query
}
