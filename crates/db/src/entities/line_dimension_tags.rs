//! `SeaORM` Entity for line_dimension_tags table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "line_dimension_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub line_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub dimension_value_id: Uuid,
    pub dimension_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entry_lines::Entity",
        from = "Column::LineId",
        to = "super::journal_entry_lines::Column::Id",
        on_delete = "Cascade"
    )]
    JournalEntryLines,
    #[sea_orm(
        belongs_to = "super::dimension_values::Entity",
        from = "Column::DimensionValueId",
        to = "super::dimension_values::Column::Id"
    )]
    DimensionValues,
}

impl Related<super::journal_entry_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryLines.def()
    }
}

impl Related<super::dimension_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DimensionValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
