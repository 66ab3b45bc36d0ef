//! Bill DTOs
//!
//! The create and update payloads share the same trip-type-dependent shape:
//! HOURLY bills carry start/end timestamps, COUNT bills carry a unit count.
//! The conversion into typed trip parameters rejects payloads missing the
//! fields their trip type requires.

use chrono::{DateTime, Utc};
use fieldbill_core::models::{Bill, BillStatus, JobType, TripType};
use fieldbill_core::{AppError, AppResult};
use fieldbill_services::TripParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Bill creation/update payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BillRequest {
    /// Owning customer
    pub customer_id: Uuid,

    /// Machine used for the job (JCB or TRACTOR)
    pub job_type: String,

    /// How the job is billed (HOURLY or COUNT)
    pub trip_type: String,

    /// Rate: per hour for HOURLY, per unit for COUNT
    pub rate: Decimal,

    /// Billing date
    pub date: DateTime<Utc>,

    /// Job start (HOURLY only)
    pub start_time: Option<DateTime<Utc>>,

    /// Job end (HOURLY only)
    pub end_time: Option<DateTime<Utc>>,

    /// Unit count (COUNT only)
    pub count: Option<Decimal>,
}

impl BillRequest {
    /// Parse the job type
    pub fn job_type(&self) -> AppResult<JobType> {
        JobType::from_str(&self.job_type)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown job type: {}", self.job_type)))
    }

    /// Parse the trip type and its required parameters
    pub fn trip_params(&self) -> AppResult<(TripType, TripParams)> {
        let trip_type = TripType::from_str(&self.trip_type).ok_or_else(|| {
            AppError::InvalidInput(format!("Unknown trip type: {}", self.trip_type))
        })?;

        let params = match trip_type {
            TripType::Hourly => {
                let start_time = self
                    .start_time
                    .ok_or_else(|| AppError::MissingField("start_time".to_string()))?;
                let end_time = self
                    .end_time
                    .ok_or_else(|| AppError::MissingField("end_time".to_string()))?;
                TripParams::Hourly {
                    start_time,
                    end_time,
                }
            }
            TripType::Count => {
                let count = self
                    .count
                    .ok_or_else(|| AppError::MissingField("count".to_string()))?;
                TripParams::Count { count }
            }
        };

        Ok((trip_type, params))
    }
}

/// Filter query parameters for bill listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillFilterParams {
    /// Restrict to one customer's bills
    pub customer_id: Option<Uuid>,
}

/// Bill response
#[derive(Debug, Clone, Serialize)]
pub struct BillResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub job_type: JobType,
    pub trip_type: TripType,
    pub rate: Decimal,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<Decimal>,
    pub amount: Decimal,
    pub amount_pending: Decimal,
    pub status: BillStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id,
            customer_id: bill.customer_id,
            job_type: bill.job_type,
            trip_type: bill.trip_type,
            rate: bill.rate,
            date: bill.date,
            start_time: bill.start_time,
            end_time: bill.end_time,
            count: bill.count,
            amount: bill.amount,
            amount_pending: bill.amount_pending,
            status: bill.status,
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_request() -> BillRequest {
        BillRequest {
            customer_id: Uuid::new_v4(),
            job_type: "JCB".to_string(),
            trip_type: "COUNT".to_string(),
            rate: dec!(150),
            date: Utc::now(),
            start_time: None,
            end_time: None,
            count: Some(dec!(4)),
        }
    }

    #[test]
    fn test_count_request_parses() {
        let req = base_request();
        let (trip_type, params) = req.trip_params().unwrap();
        assert_eq!(trip_type, TripType::Count);
        assert_eq!(params, TripParams::Count { count: dec!(4) });
    }

    #[test]
    fn test_hourly_request_missing_times_rejected() {
        let req = BillRequest {
            trip_type: "HOURLY".to_string(),
            ..base_request()
        };
        let result = req.trip_params();
        assert!(matches!(result, Err(AppError::MissingField(_))));
    }

    #[test]
    fn test_unknown_trip_type_rejected() {
        let req = BillRequest {
            trip_type: "WEEKLY".to_string(),
            ..base_request()
        };
        assert!(matches!(
            req.trip_params(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_job_type_rejected() {
        let req = BillRequest {
            job_type: "CRANE".to_string(),
            ..base_request()
        };
        assert!(matches!(req.job_type(), Err(AppError::InvalidInput(_))));
    }
}
