//! `SeaORM` entity definitions.

pub mod accounts;
pub mod attachments;
pub mod clients;
pub mod consolidation_group_members;
pub mod consolidation_groups;
pub mod dimension_values;
pub mod dimensions;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod legal_entities;
pub mod line_dimension_tags;
pub mod sea_orm_active_enums;
