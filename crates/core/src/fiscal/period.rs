//! Fiscal period domain type.
//!
//! Periods are owned by an external configuration module; the ledger engine
//! consumes them to gate postings. A period is either open or closed, and an
//! entry may only land in an open period whose date range covers the entry
//! date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use partida_shared::types::FiscalPeriodId;

use crate::ledger::LedgerError;

/// A bounded date range that can be open (postable) or closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// The period ID.
    pub id: FiscalPeriodId,
    /// Period name (e.g. "2024-01").
    pub name: String,
    /// First postable date.
    pub start_date: NaiveDate,
    /// Last postable date (inclusive).
    pub end_date: NaiveDate,
    /// Whether the period is closed to posting.
    pub is_closed: bool,
}

impl FiscalPeriod {
    /// Returns true if the date falls within the period range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Validates that an entry dated `date` may be posted into this period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodClosed` if the period is closed, or
    /// `DateOutsidePeriod` if the date falls outside the range.
    pub fn validate_postable(&self, date: NaiveDate) -> Result<(), LedgerError> {
        if self.is_closed {
            return Err(LedgerError::PeriodClosed(self.id));
        }
        if !self.contains(date) {
            return Err(LedgerError::DateOutsidePeriod {
                date,
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}
