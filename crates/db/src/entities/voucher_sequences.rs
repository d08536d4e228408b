//! `SeaORM` Entity for the voucher_sequences table.
//!
//! One counter row per voucher type. `last_number` is the only mutable
//! state behind document numbering; it is read and incremented under a
//! row lock inside the transaction that inserts the owning entry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "voucher_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub voucher_type_id: Uuid,
    pub last_number: i64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::voucher_types::Entity",
        from = "Column::VoucherTypeId",
        to = "super::voucher_types::Column::Id"
    )]
    VoucherTypes,
}

impl Related<super::voucher_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoucherTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
