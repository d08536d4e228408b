//! Chart-of-accounts gateway.
//!
//! The ledger engine consumes account metadata but does not own it; this
//! repository exposes the read-only view the core validation and reporting
//! code needs.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use partida_core::ledger::{AccountInfo, LedgerError};
use partida_shared::types::AccountId;

use crate::entities::chart_of_accounts;

use super::StoreError;

/// Maps an account row to the core view type.
pub(crate) fn account_info(model: chart_of_accounts::Model) -> AccountInfo {
    AccountInfo {
        id: AccountId::from_uuid(model.id),
        code: model.code,
        name: model.name,
        normal_balance: model.normal_balance.into(),
        allows_entries: model.allows_entries,
        is_active: model.is_active,
    }
}

/// Loads the accounts referenced by a line set, keyed by id.
///
/// Runs on the caller's connection so it can participate in an open
/// transaction.
pub(crate) async fn load_accounts<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, AccountInfo>, StoreError> {
    let rows = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.id, account_info(row)))
        .collect())
}

/// Read-only repository over the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets an account by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no such account exists.
    pub async fn get(&self, account_id: AccountId) -> Result<AccountInfo, StoreError> {
        let row = chart_of_accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        Ok(account_info(row))
    }

    /// Lists the active accounts that allow journal lines, ordered by code.
    pub async fn list_postable(&self) -> Result<Vec<AccountInfo>, StoreError> {
        let rows = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::AllowsEntries.eq(true))
            .filter(chart_of_accounts::Column::IsActive.eq(true))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(account_info).collect())
    }
}
