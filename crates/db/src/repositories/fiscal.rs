//! Fiscal period gateway.

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};

use partida_core::fiscal::FiscalPeriod;
use partida_core::ledger::LedgerError;
use partida_shared::types::FiscalPeriodId;

use crate::entities::fiscal_periods;

use super::StoreError;

/// Maps a period row to the core domain type.
pub(crate) fn period_info(model: fiscal_periods::Model) -> FiscalPeriod {
    FiscalPeriod {
        id: FiscalPeriodId::from_uuid(model.id),
        name: model.name,
        start_date: model.start_date,
        end_date: model.end_date,
        is_closed: model.is_closed,
    }
}

/// Finds a period by id on the caller's connection.
pub(crate) async fn find_period<C: ConnectionTrait>(
    conn: &C,
    period_id: FiscalPeriodId,
) -> Result<FiscalPeriod, StoreError> {
    let row = fiscal_periods::Entity::find_by_id(period_id.into_inner())
        .one(conn)
        .await?
        .ok_or(LedgerError::PeriodNotFound(period_id))?;
    Ok(period_info(row))
}

/// Finds the period containing a date on the caller's connection.
pub(crate) async fn find_period_for_date<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
) -> Result<FiscalPeriod, StoreError> {
    let row = fiscal_periods::Entity::find()
        .filter(fiscal_periods::Column::StartDate.lte(date))
        .filter(fiscal_periods::Column::EndDate.gte(date))
        .one(conn)
        .await?
        .ok_or(LedgerError::NoPeriodForDate(date))?;
    Ok(period_info(row))
}

/// Read-only repository over fiscal periods.
#[derive(Debug, Clone)]
pub struct FiscalPeriodRepository {
    db: DatabaseConnection,
}

impl FiscalPeriodRepository {
    /// Creates a new fiscal period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a period by id.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if no such period exists.
    pub async fn get(&self, period_id: FiscalPeriodId) -> Result<FiscalPeriod, StoreError> {
        find_period(&self.db, period_id).await
    }

    /// Finds the period containing the given date.
    ///
    /// # Errors
    ///
    /// Returns `NoPeriodForDate` if no period covers the date.
    pub async fn find_for_date(&self, date: NaiveDate) -> Result<FiscalPeriod, StoreError> {
        find_period_for_date(&self.db, date).await
    }
}
