//! `SeaORM` Entity for journal_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub entity_id: Uuid,
    pub entry_date: Date,
    pub description: String,
    pub reference: Option<String>,
    pub is_accrual: bool,
    pub reversal_date: Option<Date>,
    pub status: EntryStatus,
    pub reversal_of: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::legal_entities::Entity",
        from = "Column::EntityId",
        to = "super::legal_entities::Column::Id"
    )]
    LegalEntities,
    #[sea_orm(has_many = "super::journal_entry_lines::Entity")]
    JournalEntryLines,
    #[sea_orm(has_many = "super::attachments::Entity")]
    Attachments,
}

impl Related<super::legal_entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LegalEntities.def()
    }
}

impl Related<super::journal_entry_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryLines.def()
    }
}

impl Related<super::attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
