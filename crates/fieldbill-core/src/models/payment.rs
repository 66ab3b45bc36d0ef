//! Payment model
//!
//! A payment row records funds applied to exactly one bill. Payments are
//! immutable once written; a single incoming payment can produce several
//! rows, one per bill the waterfall allocation touched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: Uuid,

    /// Bill this payment settles (fully or partially)
    pub bill_id: Uuid,

    /// Paying customer
    pub customer_id: Uuid,

    /// Amount applied to the bill; never exceeds the bill's pending
    /// balance at allocation time
    pub amount: Decimal,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// One payment-to-bill assignment produced by the waterfall allocator,
/// before it is persisted as a [`Payment`] row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAllocation {
    /// Bill the slice is applied to
    pub bill_id: Uuid,

    /// Paying customer
    pub customer_id: Uuid,

    /// Slice of the incoming payment applied to this bill
    pub amount: Decimal,
}
