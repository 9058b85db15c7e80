//! Dimension domain types.

use ledgerwise_shared::types::{ClientId, DimensionId, DimensionValueId};
use serde::{Deserialize, Serialize};

/// A classification axis such as Department or Project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Dimension id.
    pub id: DimensionId,
    /// Owning client.
    pub client_id: ClientId,
    /// Short code, e.g. `DEPT`.
    pub code: String,
    /// Display name, e.g. `Department`.
    pub name: String,
    /// Inactive dimensions reject new tags.
    pub is_active: bool,
}

/// A permitted value of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionValue {
    /// Value id.
    pub id: DimensionValueId,
    /// Dimension this value belongs to.
    pub dimension_id: DimensionId,
    /// Optional short code.
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Inactive values reject new tags.
    pub is_active: bool,
}

/// A dimension value attached to a journal line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionTag {
    /// Dimension id.
    pub dimension_id: DimensionId,
    /// Value id; must belong to `dimension_id`.
    pub dimension_value_id: DimensionValueId,
    /// Denormalized dimension name.
    pub dimension_name: String,
    /// Denormalized value name.
    pub value_name: String,
}

/// An unknown value an importer may approve for creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingDimensionValue {
    /// Dimension the value would join.
    pub dimension_id: DimensionId,
    /// Dimension name, for display.
    pub dimension_name: String,
    /// Value name as typed.
    pub value_name: String,
}
