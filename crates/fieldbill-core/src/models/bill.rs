//! Bill model
//!
//! Represents one billable machine job with a computed amount and an
//! outstanding balance that payments settle over time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Job type enumeration
///
/// Informational only; does not affect the amount calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobType {
    /// Excavator job
    Jcb,
    /// Tractor job
    Tractor,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobType::Jcb => write!(f, "JCB"),
            JobType::Tractor => write!(f, "TRACTOR"),
        }
    }
}

impl JobType {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "JCB" => Some(JobType::Jcb),
            "TRACTOR" => Some(JobType::Tractor),
            _ => None,
        }
    }
}

/// Trip type enumeration
///
/// Determines which parameters drive the amount calculation:
/// hourly jobs are billed on elapsed time, count jobs on a unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TripType {
    /// Billed as rate x elapsed hours (start/end timestamps required)
    Hourly,
    /// Billed as rate x count
    Count,
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripType::Hourly => write!(f, "HOURLY"),
            TripType::Count => write!(f, "COUNT"),
        }
    }
}

impl TripType {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HOURLY" => Some(TripType::Hourly),
            "COUNT" => Some(TripType::Count),
            _ => None,
        }
    }
}

/// Bill payment status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    /// Nothing paid yet; pending balance equals the full amount
    #[default]
    NotPaid,
    /// Partially settled; pending balance strictly between zero and amount
    Pending,
    /// Fully settled; pending balance is zero
    Closed,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillStatus::NotPaid => write!(f, "NOT_PAID"),
            BillStatus::Pending => write!(f, "PENDING"),
            BillStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl BillStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NOT_PAID" => Some(BillStatus::NotPaid),
            "PENDING" => Some(BillStatus::Pending),
            "CLOSED" => Some(BillStatus::Closed),
            _ => None,
        }
    }

    /// Check if the bill can still receive payment allocations
    pub fn is_open(&self) -> bool {
        !matches!(self, BillStatus::Closed)
    }
}

/// Bill entity
///
/// Represents one billable job. The stored `amount` is computed once at
/// creation (and recomputed on edit); `amount_pending` is the outstanding
/// balance that settlement decrements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: Uuid,

    /// Owning customer (reference only, no back-pointer)
    pub customer_id: Uuid,

    /// Machine used for the job
    pub job_type: JobType,

    /// How the job is billed
    pub trip_type: TripType,

    /// Rate: per hour for HOURLY, per unit for COUNT
    pub rate: Decimal,

    /// Billing date; payment allocation walks bills in this order
    pub date: DateTime<Utc>,

    /// Job start (HOURLY only)
    pub start_time: Option<DateTime<Utc>>,

    /// Job end (HOURLY only)
    pub end_time: Option<DateTime<Utc>>,

    /// Unit count (COUNT only)
    pub count: Option<Decimal>,

    /// Total charge for the job
    pub amount: Decimal,

    /// Outstanding balance
    pub amount_pending: Decimal,

    /// Payment status, kept consistent with `amount_pending`
    pub status: BillStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Check if the bill can still receive payment allocations
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Check the status/balance consistency invariant:
    /// `Closed` iff zero pending, `NotPaid` iff fully pending.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            BillStatus::Closed => self.amount_pending == Decimal::ZERO,
            BillStatus::NotPaid => self.amount_pending == self.amount,
            BillStatus::Pending => {
                self.amount_pending > Decimal::ZERO && self.amount_pending < self.amount
            }
        }
    }
}

impl Default for Bill {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            job_type: JobType::Tractor,
            trip_type: TripType::Count,
            rate: Decimal::ZERO,
            date: Utc::now(),
            start_time: None,
            end_time: None,
            count: None,
            amount: Decimal::ZERO,
            amount_pending: Decimal::ZERO,
            status: BillStatus::NotPaid,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_is_open() {
        assert!(BillStatus::NotPaid.is_open());
        assert!(BillStatus::Pending.is_open());
        assert!(!BillStatus::Closed.is_open());
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [BillStatus::NotPaid, BillStatus::Pending, BillStatus::Closed] {
            assert_eq!(BillStatus::from_str(&status.to_string()), Some(status));
        }
        assert_eq!(BillStatus::from_str("not_paid"), Some(BillStatus::NotPaid));
        assert_eq!(BillStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_trip_type_parse() {
        assert_eq!(TripType::from_str("hourly"), Some(TripType::Hourly));
        assert_eq!(TripType::from_str("COUNT"), Some(TripType::Count));
        assert_eq!(TripType::from_str("weekly"), None);
    }

    #[test]
    fn test_consistency_check() {
        let bill = Bill {
            amount: dec!(100),
            amount_pending: dec!(100),
            status: BillStatus::NotPaid,
            ..Default::default()
        };
        assert!(bill.is_consistent());

        let bill = Bill {
            amount: dec!(100),
            amount_pending: dec!(40),
            status: BillStatus::Pending,
            ..Default::default()
        };
        assert!(bill.is_consistent());

        let bill = Bill {
            amount: dec!(100),
            amount_pending: dec!(0),
            status: BillStatus::Pending,
            ..Default::default()
        };
        assert!(!bill.is_consistent());
    }
}
