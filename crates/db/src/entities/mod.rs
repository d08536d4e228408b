//! `SeaORM` entity definitions for the ledger schema.

pub mod chart_of_accounts;
pub mod fiscal_periods;
pub mod journal_entries;
pub mod journal_lines;
pub mod legal_documents;
pub mod sea_orm_active_enums;
pub mod voucher_sequences;
pub mod voucher_types;
