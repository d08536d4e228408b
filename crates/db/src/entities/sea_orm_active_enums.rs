//! `SeaORM` active enums mapping the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Journal entry status (`entry_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Entry has been posted to the ledger.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Entry has been reversed.
    #[sea_orm(string_value = "reversed")]
    Reversed,
    /// Entry was cancelled before posting.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Legal document status (`document_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Document is being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Document has been approved.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Document has been cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Account normal-balance polarity (`normal_balance` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_balance")]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal account.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credit-normal account.
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<EntryStatus> for partida_core::ledger::EntryStatus {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Reversed => Self::Reversed,
            EntryStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<partida_core::ledger::EntryStatus> for EntryStatus {
    fn from(status: partida_core::ledger::EntryStatus) -> Self {
        match status {
            partida_core::ledger::EntryStatus::Draft => Self::Draft,
            partida_core::ledger::EntryStatus::Posted => Self::Posted,
            partida_core::ledger::EntryStatus::Reversed => Self::Reversed,
            partida_core::ledger::EntryStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<DocumentStatus> for partida_core::voucher::DocumentStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Draft => Self::Draft,
            DocumentStatus::Approved => Self::Approved,
            DocumentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<partida_core::voucher::DocumentStatus> for DocumentStatus {
    fn from(status: partida_core::voucher::DocumentStatus) -> Self {
        match status {
            partida_core::voucher::DocumentStatus::Draft => Self::Draft,
            partida_core::voucher::DocumentStatus::Approved => Self::Approved,
            partida_core::voucher::DocumentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<NormalBalance> for partida_core::ledger::NormalBalance {
    fn from(polarity: NormalBalance) -> Self {
        match polarity {
            NormalBalance::Debit => Self::Debit,
            NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<partida_core::ledger::NormalBalance> for NormalBalance {
    fn from(polarity: partida_core::ledger::NormalBalance) -> Self {
        match polarity {
            partida_core::ledger::NormalBalance::Debit => Self::Debit,
            partida_core::ledger::NormalBalance::Credit => Self::Credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_status_round_trip() {
        for status in [
            partida_core::ledger::EntryStatus::Draft,
            partida_core::ledger::EntryStatus::Posted,
            partida_core::ledger::EntryStatus::Reversed,
            partida_core::ledger::EntryStatus::Cancelled,
        ] {
            let db: EntryStatus = status.into();
            let back: partida_core::ledger::EntryStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_document_status_round_trip() {
        for status in [
            partida_core::voucher::DocumentStatus::Draft,
            partida_core::voucher::DocumentStatus::Approved,
            partida_core::voucher::DocumentStatus::Cancelled,
        ] {
            let db: DocumentStatus = status.into();
            let back: partida_core::voucher::DocumentStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_normal_balance_round_trip() {
        for polarity in [
            partida_core::ledger::NormalBalance::Debit,
            partida_core::ledger::NormalBalance::Credit,
        ] {
            let db: NormalBalance = polarity.into();
            let back: partida_core::ledger::NormalBalance = db.into();
            assert_eq!(back, polarity);
        }
    }
}
