//! FieldBill Business Services
//!
//! This crate implements the billing engine:
//!
//! - Amount calculation for hourly and count jobs
//! - Bill ledger rules (creation and revision of amounts/balances)
//! - Oldest-first waterfall allocation of payments across open bills
//! - Transactional settlement applying allocations to bills

pub mod allocation;
pub mod charges;
pub mod ledger;
pub mod settlement;

pub use allocation::allocate;
pub use ledger::{BillDraft, Revision, TripParams};
pub use settlement::SettlementEngine;
