//! Account repository for chart of accounts database operations.
//!
//! Mutation rules live in `ledgerwise_core::accounts`; this repository loads
//! the chart, lets the core decide, and persists the outcome.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use ledgerwise_core::accounts::{
    Account, AccountError, AccountFacts, AccountType, AccountUpdate, ChartIndex, ChartOfAccounts,
    ChartReconciler, ImportSummary, ReconciliationPlan, RemovalMode, resolve_parent_links,
};
use ledgerwise_core::import::ImportRow;
use ledgerwise_shared::AppError;
use ledgerwise_shared::types::{AccountId, ClientId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    accounts, journal_entry_lines, sea_orm_active_enums::AccountType as DbAccountType,
};

/// Error types for account repository operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountRepositoryError {
    /// Business rule rejected the change.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountRepositoryError> for AppError {
    fn from(err: AccountRepositoryError) -> Self {
        match err {
            AccountRepositoryError::Account(e) => e.into(),
            AccountRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a client's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, client_id: ClientId) -> Result<Vec<Account>, AccountRepositoryError> {
        Ok(list_accounts(&self.db, client_id).await?)
    }

    /// Number of journal lines per account, for accounts that have any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn line_counts(
        &self,
        client_id: ClientId,
    ) -> Result<HashMap<AccountId, u64>, AccountRepositoryError> {
        let rows: Vec<(Uuid, i64)> = journal_entry_lines::Entity::find()
            .join(JoinType::InnerJoin, journal_entry_lines::Relation::Accounts.def())
            .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
            .select_only()
            .column(journal_entry_lines::Column::AccountId)
            .column_as(
                Expr::col((journal_entry_lines::Entity, journal_entry_lines::Column::Id)).count(),
                "line_count",
            )
            .group_by(journal_entry_lines::Column::AccountId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, n)| (AccountId::from_uuid(id), u64::try_from(n).unwrap_or(0)))
            .collect())
    }

    /// Accounts referenced by at least one journal line.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn accounts_with_lines(
        &self,
        client_id: ClientId,
    ) -> Result<HashSet<AccountId>, AccountRepositoryError> {
        Ok(self.line_counts(client_id).await?.into_keys().collect())
    }

    /// Accounts that are the parent of at least one other account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn accounts_with_children(
        &self,
        client_id: ClientId,
    ) -> Result<HashSet<AccountId>, AccountRepositoryError> {
        let parents: Vec<Option<Uuid>> = accounts::Entity::find()
            .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
            .filter(accounts::Column::ParentId.is_not_null())
            .select_only()
            .column(accounts::Column::ParentId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(parents.into_iter().flatten().map(AccountId::from_uuid).collect())
    }

    /// Loads the chart with line counts, ready for core-side decisions.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn load_chart(
        &self,
        client_id: ClientId,
    ) -> Result<ChartOfAccounts, AccountRepositoryError> {
        let accounts = self.list(client_id).await?;
        let counts = self.line_counts(client_id).await?;
        let mut chart = ChartOfAccounts::new(client_id, accounts);
        for (id, n) in counts {
            chart.record_lines(id, usize::try_from(n).unwrap_or(usize::MAX));
        }
        Ok(chart)
    }

    /// Reconciles uploaded rows against the stored chart without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn plan_import(
        &self,
        client_id: ClientId,
        rows: &[ImportRow],
        mode: RemovalMode,
    ) -> Result<ReconciliationPlan, AccountRepositoryError> {
        let existing = self.list(client_id).await?;
        let with_lines = self.accounts_with_lines(client_id).await?;
        let facts = AccountFacts::from_accounts(&existing, with_lines);
        Ok(ChartReconciler::reconcile(client_id, &existing, rows, &facts, mode))
    }

    /// Applies a reconciliation plan inside one database transaction.
    ///
    /// Order: adds, updates, deactivations, deletions, then parent links
    /// resolved against the post-add chart. Any database failure rolls back
    /// the whole import.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub async fn apply_import_plan(
        &self,
        client_id: ClientId,
        plan: &ReconciliationPlan,
    ) -> Result<ImportSummary, AccountRepositoryError> {
        let mut summary = ImportSummary::from_plan(plan);
        let txn = self.db.begin().await?;
        let now = Utc::now();

        for account in plan.adds() {
            accounts::ActiveModel {
                id: Set(account.id.into_inner()),
                client_id: Set(client_id.into_inner()),
                code: Set(account.code.clone()),
                name: Set(account.name.clone()),
                account_type: Set(to_db_account_type(account.account_type)),
                subtype: Set(account.subtype.clone()),
                description: Set(account.description.clone()),
                parent_id: Set(None),
                is_active: Set(account.is_active),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
        }

        for (id, changes) in plan.updates() {
            update_row(&txn, client_id, id, changes).await?;
        }

        let deactivate: Vec<Uuid> = plan.deactivations().map(AccountId::into_inner).collect();
        if !deactivate.is_empty() {
            accounts::Entity::update_many()
                .col_expr(accounts::Column::IsActive, Expr::value(false))
                .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
                .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
                .filter(accounts::Column::Id.is_in(deactivate))
                .exec(&txn)
                .await?;
        }

        let delete: Vec<Uuid> = plan.deletions().map(AccountId::into_inner).collect();
        if !delete.is_empty() {
            accounts::Entity::delete_many()
                .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
                .filter(accounts::Column::Id.is_in(delete))
                .exec(&txn)
                .await?;
        }

        let index = ChartIndex::new(list_accounts(&txn, client_id).await?);
        let resolution = resolve_parent_links(&index, &plan.parent_links);
        for assignment in &resolution.assignments {
            accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::ParentId,
                    Expr::value(assignment.parent_id.into_inner()),
                )
                .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
                .filter(accounts::Column::Id.eq(assignment.account_id.into_inner()))
                .exec(&txn)
                .await?;
        }
        summary.parents_linked = resolution.assignments.len();
        summary.warnings.extend(resolution.warnings);

        txn.commit().await?;

        info!(
            client_id = %client_id,
            added = summary.added,
            updated = summary.updated,
            deactivated = summary.deactivated,
            deleted = summary.deleted,
            parents_linked = summary.parents_linked,
            warnings = summary.warnings.len(),
            "Chart of accounts import committed"
        );
        Ok(summary)
    }

    /// Updates one account, enforcing the has-transactions rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown, the code is taken, a
    /// frozen field would change, or the database fails.
    pub async fn update_account(
        &self,
        client_id: ClientId,
        id: AccountId,
        update: &AccountUpdate,
    ) -> Result<Account, AccountRepositoryError> {
        let mut chart = self.load_chart(client_id).await?;
        let account = chart.update_account(id, update)?.clone();
        update_row(&self.db, client_id, id, update).await?;
        Ok(account)
    }

    /// Sets or clears an account's parent by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the account or parent is unknown, or the link
    /// would create a cycle.
    pub async fn set_parent(
        &self,
        client_id: ClientId,
        id: AccountId,
        parent_code: Option<&str>,
    ) -> Result<(), AccountRepositoryError> {
        let mut chart = self.load_chart(client_id).await?;
        chart.set_parent(id, parent_code)?;
        let parent_id = parent_code
            .and_then(|code| chart.find_by_code(code))
            .map(|p| p.id.into_inner());

        accounts::Entity::update_many()
            .col_expr(accounts::Column::ParentId, Expr::value(parent_id))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Deletes an account that has neither lines nor children.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown, still referenced, or the
    /// database fails.
    pub async fn delete_account(
        &self,
        client_id: ClientId,
        id: AccountId,
    ) -> Result<Account, AccountRepositoryError> {
        let mut chart = self.load_chart(client_id).await?;
        let account = chart.delete_account(id)?;
        accounts::Entity::delete_many()
            .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await?;
        Ok(account)
    }
}

/// Lists a client's accounts on any connection, including open transactions.
pub(crate) async fn list_accounts<C: ConnectionTrait>(
    db: &C,
    client_id: ClientId,
) -> Result<Vec<Account>, DbErr> {
    let models = accounts::Entity::find()
        .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
        .order_by_asc(accounts::Column::Code)
        .all(db)
        .await?;
    Ok(models.into_iter().map(to_domain).collect())
}

async fn update_row<C: ConnectionTrait>(
    db: &C,
    client_id: ClientId,
    id: AccountId,
    changes: &AccountUpdate,
) -> Result<(), AccountRepositoryError> {
    let model = accounts::Entity::find_by_id(id.into_inner())
        .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
        .one(db)
        .await?
        .ok_or(AccountError::NotFound(id))?;

    let mut active: accounts::ActiveModel = model.into();
    if let Some(code) = &changes.code {
        active.code = Set(code.clone());
    }
    if let Some(name) = &changes.name {
        active.name = Set(name.clone());
    }
    if let Some(account_type) = changes.account_type {
        active.account_type = Set(to_db_account_type(account_type));
    }
    if let Some(subtype) = &changes.subtype {
        active.subtype = Set(Some(subtype.clone()));
    }
    if let Some(description) = &changes.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());
    active.update(db).await?;
    Ok(())
}

/// Convert domain account type to database enum.
#[must_use]
pub const fn to_db_account_type(t: AccountType) -> DbAccountType {
    match t {
        AccountType::Asset => DbAccountType::Asset,
        AccountType::Liability => DbAccountType::Liability,
        AccountType::Equity => DbAccountType::Equity,
        AccountType::Revenue => DbAccountType::Revenue,
        AccountType::Expense => DbAccountType::Expense,
    }
}

/// Convert database account type to domain enum.
#[must_use]
pub const fn from_db_account_type(t: DbAccountType) -> AccountType {
    match t {
        DbAccountType::Asset => AccountType::Asset,
        DbAccountType::Liability => AccountType::Liability,
        DbAccountType::Equity => AccountType::Equity,
        DbAccountType::Revenue => AccountType::Revenue,
        DbAccountType::Expense => AccountType::Expense,
    }
}

/// Convert database model to domain model.
pub(crate) fn to_domain(model: accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(model.id),
        client_id: ClientId::from_uuid(model.client_id),
        code: model.code,
        name: model.name,
        account_type: from_db_account_type(model.account_type),
        subtype: model.subtype,
        description: model.description,
        parent_id: model.parent_id.map(AccountId::from_uuid),
        is_active: model.is_active,
    }
}
