//! Gap-free document number allocation.
//!
//! One counter row per voucher type. Allocation reads and increments the
//! counter under `SELECT … FOR UPDATE` inside the same transaction that
//! inserts the owning entry, so two concurrent allocations for the same
//! type serialize on the row lock, no number is issued twice, and a rolled
//! back caller rolls its number back with it, so the sequence stays gap-free.
//! This is the one place where write-write contention is expected; it is
//! resolved by blocking on the lock, never by retrying with a fresh number.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, QuerySelect, Set};

use partida_core::ledger::LedgerError;
use partida_core::numbering::NumberFormat;
use partida_shared::types::VoucherTypeId;

use crate::entities::{voucher_sequences, voucher_types};

use super::StoreError;

/// Allocates the next entry number for a voucher type.
///
/// Must be called inside the transaction that inserts the owning entry.
pub(crate) async fn next_entry_number(
    txn: &DatabaseTransaction,
    voucher_type: &voucher_types::Model,
) -> Result<String, StoreError> {
    let now = Utc::now().into();

    // Lock the counter row; a missing row is seeded at zero first. The
    // primary key makes a concurrent first allocation fail loudly instead
    // of issuing a duplicate.
    let locked = voucher_sequences::Entity::find_by_id(voucher_type.id)
        .lock_exclusive()
        .one(txn)
        .await?;

    let last_number = match locked {
        Some(row) => row.last_number,
        None => {
            voucher_sequences::ActiveModel {
                voucher_type_id: Set(voucher_type.id),
                last_number: Set(0),
                updated_at: Set(now),
            }
            .insert(txn)
            .await?;
            0
        }
    };

    let next = last_number + 1;
    voucher_sequences::ActiveModel {
        voucher_type_id: Set(voucher_type.id),
        last_number: Set(next),
        updated_at: Set(now),
    }
    .update(txn)
    .await?;

    let width = usize::try_from(voucher_type.number_width).unwrap_or(0);
    Ok(NumberFormat::new(voucher_type.number_prefix.clone(), width).format(next))
}

/// Loads a voucher type row on the caller's transaction.
pub(crate) async fn find_voucher_type(
    txn: &DatabaseTransaction,
    voucher_type_id: VoucherTypeId,
) -> Result<voucher_types::Model, StoreError> {
    let row = voucher_types::Entity::find_by_id(voucher_type_id.into_inner())
        .one(txn)
        .await?
        .ok_or(LedgerError::VoucherTypeNotFound(voucher_type_id))?;
    Ok(row)
}

/// Sequence allocator for per-voucher-type document numbers.
#[derive(Debug, Clone)]
pub struct SequenceRepository;

impl SequenceRepository {
    /// Allocates the next number for a voucher type inside `txn`.
    ///
    /// The caller owns the transaction: the issued number commits or rolls
    /// back together with the header that consumes it.
    ///
    /// # Errors
    ///
    /// Returns `VoucherTypeNotFound` for an unknown type, or a database
    /// error.
    pub async fn next_number(
        txn: &DatabaseTransaction,
        voucher_type_id: VoucherTypeId,
    ) -> Result<String, StoreError> {
        let voucher_type = find_voucher_type(txn, voucher_type_id).await?;
        next_entry_number(txn, &voucher_type).await
    }
}

/// Helper used by tests and callers that need the rendered pattern of a
/// voucher type without allocating.
#[must_use]
pub fn format_for(voucher_type: &voucher_types::Model, counter: i64) -> String {
    let width = usize::try_from(voucher_type.number_width).unwrap_or(0);
    NumberFormat::new(voucher_type.number_prefix.clone(), width).format(counter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn voucher_type(prefix: &str, width: i16) -> voucher_types::Model {
        voucher_types::Model {
            id: Uuid::now_v7(),
            code: "CI".to_string(),
            name: "Comprobante de Ingreso".to_string(),
            number_prefix: prefix.to_string(),
            number_width: width,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_format_follows_type_pattern() {
        let vt = voucher_type("CI-", 6);
        assert_eq!(format_for(&vt, 1), "CI-000001");
        assert_eq!(format_for(&vt, 120), "CI-000120");
    }

    #[test]
    fn test_negative_width_falls_back_to_plain() {
        let vt = voucher_type("X", -1);
        assert_eq!(format_for(&vt, 5), "X5");
    }
}
