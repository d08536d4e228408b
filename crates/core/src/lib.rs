//! Core ledger business logic for Partida.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `ledger` - Journal entry validation, state machine, and balance math
//! - `fiscal` - Fiscal period posting gates
//! - `numbering` - Document number formatting for the sequence allocator
//! - `reports` - Trial balance (Balance de Comprobación) construction
//! - `voucher` - Document/voucher bridge rules

pub mod fiscal;
pub mod ledger;
pub mod numbering;
pub mod reports;
pub mod voucher;
