//! `SeaORM` Entity for the voucher_types table.
//!
//! A voucher type carries the numbering pattern applied by the sequence
//! allocator (`number_prefix` + zero-padded `number_width`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "voucher_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub number_prefix: String,
    pub number_width: i16,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
    #[sea_orm(has_one = "super::voucher_sequences::Entity")]
    VoucherSequences,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::voucher_sequences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoucherSequences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
