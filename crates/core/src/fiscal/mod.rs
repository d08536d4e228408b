//! Fiscal period posting gates.

pub mod period;

pub use period::FiscalPeriod;
