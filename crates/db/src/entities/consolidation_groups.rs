//! `SeaORM` Entity for consolidation_groups table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "consolidation_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::consolidation_group_members::Entity")]
    ConsolidationGroupMembers,
}

impl Related<super::consolidation_group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsolidationGroupMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
