//! Dimension repository for dimensions and their permitted values.

use chrono::Utc;
use ledgerwise_core::dimension::{
    Dimension, DimensionCatalog, DimensionError, DimensionValue, PendingDimensionValue,
};
use ledgerwise_shared::AppError;
use ledgerwise_shared::types::{ClientId, DimensionId, DimensionValueId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::info;

use crate::entities::{dimension_values, dimensions};

/// Error types for dimension repository operations.
#[derive(Debug, thiserror::Error)]
pub enum DimensionRepositoryError {
    /// Dimension code already exists for the client.
    #[error("Dimension code '{0}' already exists")]
    DuplicateCode(String),

    /// Catalog rule rejected the value.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DimensionRepositoryError> for AppError {
    fn from(err: DimensionRepositoryError) -> Self {
        match err {
            DimensionRepositoryError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            DimensionRepositoryError::Dimension(e) => e.into(),
            DimensionRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Dimension repository.
#[derive(Debug, Clone)]
pub struct DimensionRepository {
    db: DatabaseConnection,
}

impl DimensionRepository {
    /// Creates a new dimension repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every dimension and value of a client into a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_catalog(
        &self,
        client_id: ClientId,
    ) -> Result<DimensionCatalog, DimensionRepositoryError> {
        Ok(load_catalog(&self.db, client_id).await?)
    }

    /// Creates a dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub async fn create_dimension(
        &self,
        client_id: ClientId,
        code: &str,
        name: &str,
    ) -> Result<Dimension, DimensionRepositoryError> {
        let existing = dimensions::Entity::find()
            .filter(dimensions::Column::ClientId.eq(client_id.into_inner()))
            .filter(dimensions::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(DimensionRepositoryError::DuplicateCode(code.to_string()));
        }

        let model = dimensions::ActiveModel {
            id: Set(DimensionId::new().into_inner()),
            client_id: Set(client_id.into_inner()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        Ok(dimension_to_domain(model))
    }

    /// Persists a value created in a catalog, keeping its id.
    ///
    /// A value whose id is already stored is only updated when the catalog
    /// reactivated it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or update fails.
    pub async fn create_value(
        &self,
        value: &DimensionValue,
    ) -> Result<DimensionValue, DimensionRepositoryError> {
        if let Some(model) = dimension_values::Entity::find_by_id(value.id.into_inner())
            .one(&self.db)
            .await?
        {
            if !value.is_active || model.is_active {
                return Ok(value_to_domain(model));
            }
            let mut active: dimension_values::ActiveModel = model.into();
            active.is_active = Set(true);
            let model = active.update(&self.db).await?;
            info!(
                dimension_id = %value.dimension_id,
                value = %value.name,
                "Dimension value reactivated"
            );
            return Ok(value_to_domain(model));
        }

        let model = dimension_values::ActiveModel {
            id: Set(value.id.into_inner()),
            dimension_id: Set(value.dimension_id.into_inner()),
            code: Set(value.code.clone()),
            name: Set(value.name.clone()),
            is_active: Set(value.is_active),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(
            dimension_id = %value.dimension_id,
            value = %value.name,
            "Dimension value created"
        );
        Ok(value_to_domain(model))
    }

    /// Approves a pending value: existing names resolve and are reactivated,
    /// new names are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is unknown or inactive, the name is
    /// blank, or the database fails.
    pub async fn approve_value(
        &self,
        client_id: ClientId,
        pending: &PendingDimensionValue,
    ) -> Result<DimensionValue, DimensionRepositoryError> {
        let mut catalog = self.load_catalog(client_id).await?;
        let value = catalog.approve_value(pending)?;
        self.create_value(&value).await
    }
}

/// Loads a client's catalog on any connection, including open transactions.
pub(crate) async fn load_catalog<C: ConnectionTrait>(
    db: &C,
    client_id: ClientId,
) -> Result<DimensionCatalog, DbErr> {
    let dims = dimensions::Entity::find()
        .filter(dimensions::Column::ClientId.eq(client_id.into_inner()))
        .order_by_asc(dimensions::Column::Name)
        .all(db)
        .await?;

    let values = dimension_values::Entity::find()
        .join(JoinType::InnerJoin, dimension_values::Relation::Dimensions.def())
        .filter(dimensions::Column::ClientId.eq(client_id.into_inner()))
        .order_by_asc(dimension_values::Column::Name)
        .all(db)
        .await?;

    Ok(DimensionCatalog::new(
        dims.into_iter().map(dimension_to_domain).collect(),
        values.into_iter().map(value_to_domain).collect(),
    ))
}

/// Convert database model to domain model.
fn dimension_to_domain(model: dimensions::Model) -> Dimension {
    Dimension {
        id: DimensionId::from_uuid(model.id),
        client_id: ClientId::from_uuid(model.client_id),
        code: model.code,
        name: model.name,
        is_active: model.is_active,
    }
}

/// Convert database model to domain model.
fn value_to_domain(model: dimension_values::Model) -> DimensionValue {
    DimensionValue {
        id: DimensionValueId::from_uuid(model.id),
        dimension_id: DimensionId::from_uuid(model.dimension_id),
        code: model.code,
        name: model.name,
        is_active: model.is_active,
    }
}
