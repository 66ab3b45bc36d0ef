//! Payment DTOs

use chrono::{DateTime, Utc};
use fieldbill_core::models::Payment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment creation request
///
/// The amount is allocated across the customer's open bills, oldest first;
/// one payment row per touched bill is returned.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCreateRequest {
    /// Paying customer
    pub customer_id: Uuid,

    /// Payment amount
    pub amount: Decimal,
}

/// Filter query parameters for payment listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilterParams {
    /// Restrict to one customer's payments
    pub customer_id: Option<Uuid>,

    /// Restrict to payments against one bill
    pub bill_id: Option<Uuid>,
}

/// Payment response
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub customer_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            bill_id: payment.bill_id,
            customer_id: payment.customer_id,
            amount: payment.amount,
            created_at: payment.created_at,
        }
    }
}
