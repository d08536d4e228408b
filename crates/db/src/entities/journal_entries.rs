//! `SeaORM` Entity for the journal_entries table.
//!
//! `total_debit`/`total_credit` are a cached projection recomputed from the
//! line set on every mutation; they are never written independently.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub voucher_type_id: Uuid,
    pub entry_number: String,
    pub entry_date: Date,
    pub reference: Option<String>,
    pub description: String,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub fiscal_period_id: Uuid,
    pub status: EntryStatus,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub document_type_id: Option<Uuid>,
    pub document_id: Option<Uuid>,
    pub created_by: Uuid,
    pub posted_by: Option<Uuid>,
    pub posted_at: Option<DateTimeWithTimeZone>,
    pub reversed_by: Option<Uuid>,
    pub reversed_at: Option<DateTimeWithTimeZone>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
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
    #[sea_orm(
        belongs_to = "super::fiscal_periods::Entity",
        from = "Column::FiscalPeriodId",
        to = "super::fiscal_periods::Column::Id"
    )]
    FiscalPeriods,
    #[sea_orm(
        belongs_to = "super::legal_documents::Entity",
        from = "Column::DocumentId",
        to = "super::legal_documents::Column::Id"
    )]
    LegalDocuments,
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::voucher_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoucherTypes.def()
    }
}

impl Related<super::fiscal_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FiscalPeriods.def()
    }
}

impl Related<super::legal_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LegalDocuments.def()
    }
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
