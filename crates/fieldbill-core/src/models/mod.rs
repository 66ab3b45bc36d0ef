//! Domain models for FieldBill
//!
//! This module contains all the core domain models used throughout the application.

pub mod admin;
pub mod bill;
pub mod customer;
pub mod payment;

pub use admin::{Admin, AdminInfo};
pub use bill::{Bill, BillStatus, JobType, TripType};
pub use customer::Customer;
pub use payment::{Payment, PaymentAllocation};
