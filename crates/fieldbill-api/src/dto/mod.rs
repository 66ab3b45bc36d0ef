//! Data transfer objects for the HTTP API

pub mod auth;
pub mod bill;
pub mod common;
pub mod customer;
pub mod payment;

pub use common::ApiResponse;
