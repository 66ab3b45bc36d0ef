//! Bill ledger rules
//!
//! Owns a bill's lifecycle: computing the charge at creation, recomputing
//! amount and pending balance on edit, and deriving the payment status
//! from the balance.

use crate::charges;
use chrono::{DateTime, Utc};
use fieldbill_core::models::{Bill, BillStatus, JobType};
use fieldbill_core::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

/// Trip parameters driving the amount calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripParams {
    /// Hourly job: billed on elapsed time between start and end
    Hourly {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    /// Count job: billed on a unit count
    Count { count: Decimal },
}

impl TripParams {
    /// Compute the charge for these parameters at the given rate
    pub fn charge(&self, rate: Decimal) -> AppResult<Decimal> {
        match *self {
            TripParams::Hourly {
                start_time,
                end_time,
            } => charges::hourly_amount(rate, start_time, end_time),
            TripParams::Count { count } => charges::count_amount(rate, count),
        }
    }
}

/// A fully computed bill ready to be persisted
#[derive(Debug, Clone)]
pub struct BillDraft {
    pub customer_id: Uuid,
    pub job_type: JobType,
    pub rate: Decimal,
    pub date: DateTime<Utc>,
    pub params: TripParams,
    pub amount: Decimal,
    pub amount_pending: Decimal,
    pub status: BillStatus,
}

/// The recomputed fields of an edited bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub amount: Decimal,
    pub amount_pending: Decimal,
    pub status: BillStatus,
}

/// Build a new bill: compute the charge, open the full amount as pending.
pub fn open_bill(
    customer_id: Uuid,
    job_type: JobType,
    rate: Decimal,
    date: DateTime<Utc>,
    params: TripParams,
) -> AppResult<BillDraft> {
    let amount = params.charge(rate)?;

    Ok(BillDraft {
        customer_id,
        job_type,
        rate,
        date,
        params,
        amount,
        amount_pending: amount,
        status: BillStatus::NotPaid,
    })
}

/// Recompute an edited bill's amount, pending balance, and status.
///
/// Balance policy:
/// - a NOT_PAID bill resets its pending balance to the new amount;
/// - otherwise the delta between the new and previous amount is applied
///   to the pending balance, preserving the fraction already paid.
///
/// The delta rule can produce a balance outside `[0, amount]` when the
/// stored inputs are inconsistent; the result is clamped into that range
/// and the clamp is logged.
pub fn revise_bill(previous: &Bill, rate: Decimal, params: TripParams) -> AppResult<Revision> {
    let new_amount = params.charge(rate)?;

    let raw_pending = match previous.status {
        BillStatus::NotPaid => new_amount,
        _ => previous.amount_pending + (new_amount - previous.amount),
    };

    let amount_pending = clamp_pending(previous.id, raw_pending, new_amount);
    let status = derive_status(amount_pending, new_amount);

    Ok(Revision {
        amount: new_amount,
        amount_pending,
        status,
    })
}

/// Derive the status consistent with a balance:
/// zero pending is CLOSED, fully pending is NOT_PAID, anything between
/// is PENDING.
pub fn derive_status(amount_pending: Decimal, amount: Decimal) -> BillStatus {
    if amount_pending == Decimal::ZERO {
        BillStatus::Closed
    } else if amount_pending == amount {
        BillStatus::NotPaid
    } else {
        BillStatus::Pending
    }
}

fn clamp_pending(bill_id: Uuid, raw: Decimal, amount: Decimal) -> Decimal {
    if raw < Decimal::ZERO {
        warn!(%bill_id, %raw, "pending balance underflowed on revision, clamping to 0");
        Decimal::ZERO
    } else if raw > amount {
        warn!(%bill_id, %raw, %amount, "pending balance exceeded amount on revision, clamping");
        amount
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn hourly(start_h: u32, end_h: u32) -> TripParams {
        TripParams::Hourly {
            start_time: Utc.with_ymd_and_hms(2024, 6, 1, start_h, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 6, 1, end_h, 0, 0).unwrap(),
        }
    }

    fn bill_with(amount: Decimal, pending: Decimal, status: BillStatus) -> Bill {
        Bill {
            amount,
            amount_pending: pending,
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_open_bill_hourly() {
        let draft = open_bill(
            Uuid::new_v4(),
            JobType::Jcb,
            dec!(500),
            Utc::now(),
            hourly(8, 10),
        )
        .unwrap();

        assert_eq!(draft.amount, dec!(1000));
        assert_eq!(draft.amount_pending, dec!(1000));
        assert_eq!(draft.status, BillStatus::NotPaid);
    }

    #[test]
    fn test_open_bill_count() {
        let draft = open_bill(
            Uuid::new_v4(),
            JobType::Tractor,
            dec!(150),
            Utc::now(),
            TripParams::Count { count: dec!(4) },
        )
        .unwrap();

        assert_eq!(draft.amount, dec!(600));
        assert_eq!(draft.status, BillStatus::NotPaid);
    }

    #[test]
    fn test_open_bill_rejects_bad_range() {
        let result = open_bill(
            Uuid::new_v4(),
            JobType::Jcb,
            dec!(500),
            Utc::now(),
            hourly(10, 8),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_revise_not_paid_resets_pending() {
        // amount 100 -> 150 with status NOT_PAID: full reset, not a delta
        let previous = bill_with(dec!(100), dec!(100), BillStatus::NotPaid);
        let revision = revise_bill(
            &previous,
            dec!(150),
            TripParams::Count { count: dec!(1) },
        )
        .unwrap();

        assert_eq!(revision.amount, dec!(150));
        assert_eq!(revision.amount_pending, dec!(150));
        assert_eq!(revision.status, BillStatus::NotPaid);
    }

    #[test]
    fn test_revise_pending_applies_delta() {
        // amount 100 -> 150, prior pending 40: new pending = 40 + 50 = 90
        let previous = bill_with(dec!(100), dec!(40), BillStatus::Pending);
        let revision = revise_bill(
            &previous,
            dec!(150),
            TripParams::Count { count: dec!(1) },
        )
        .unwrap();

        assert_eq!(revision.amount, dec!(150));
        assert_eq!(revision.amount_pending, dec!(90));
        assert_eq!(revision.status, BillStatus::Pending);
    }

    #[test]
    fn test_revise_delta_reaching_zero_closes() {
        // amount 100 -> 60, prior pending 40: new pending = 40 - 40 = 0
        let previous = bill_with(dec!(100), dec!(40), BillStatus::Pending);
        let revision = revise_bill(
            &previous,
            dec!(60),
            TripParams::Count { count: dec!(1) },
        )
        .unwrap();

        assert_eq!(revision.amount_pending, Decimal::ZERO);
        assert_eq!(revision.status, BillStatus::Closed);
    }

    #[test]
    fn test_revise_underflow_clamped_to_zero() {
        // amount 100 -> 30, prior pending 40: delta gives -30, floor at 0
        let previous = bill_with(dec!(100), dec!(40), BillStatus::Pending);
        let revision = revise_bill(
            &previous,
            dec!(30),
            TripParams::Count { count: dec!(1) },
        )
        .unwrap();

        assert_eq!(revision.amount_pending, Decimal::ZERO);
        assert_eq!(revision.status, BillStatus::Closed);
    }

    #[test]
    fn test_revise_overflow_clamped_to_amount() {
        // Inconsistent stored balance above the amount gets pulled back
        // into range by the clamp.
        let previous = bill_with(dec!(100), dec!(120), BillStatus::Pending);
        let revision = revise_bill(
            &previous,
            dec!(100),
            TripParams::Count { count: dec!(1) },
        )
        .unwrap();

        assert_eq!(revision.amount_pending, dec!(100));
        assert_eq!(revision.status, BillStatus::NotPaid);
    }

    #[test]
    fn test_revise_closed_bill_reopens_on_raise() {
        // A closed bill edited upward owes the difference
        let previous = bill_with(dec!(100), dec!(0), BillStatus::Closed);
        let revision = revise_bill(
            &previous,
            dec!(120),
            TripParams::Count { count: dec!(1) },
        )
        .unwrap();

        assert_eq!(revision.amount_pending, dec!(20));
        assert_eq!(revision.status, BillStatus::Pending);
    }

    #[test]
    fn test_revise_invariant_holds() {
        // After any revision, 0 <= pending <= amount
        let cases = [
            (dec!(100), dec!(100), BillStatus::NotPaid, dec!(10)),
            (dec!(100), dec!(40), BillStatus::Pending, dec!(500)),
            (dec!(100), dec!(0), BillStatus::Closed, dec!(1)),
            (dec!(100), dec!(40), BillStatus::Pending, dec!(0)),
        ];

        for (amount, pending, status, new_amount) in cases {
            let previous = bill_with(amount, pending, status);
            let revision = revise_bill(
                &previous,
                new_amount,
                TripParams::Count { count: dec!(1) },
            )
            .unwrap();

            assert!(revision.amount_pending >= Decimal::ZERO);
            assert!(revision.amount_pending <= revision.amount);
        }
    }

    #[test]
    fn test_derive_status() {
        assert_eq!(derive_status(dec!(0), dec!(100)), BillStatus::Closed);
        assert_eq!(derive_status(dec!(100), dec!(100)), BillStatus::NotPaid);
        assert_eq!(derive_status(dec!(50), dec!(100)), BillStatus::Pending);
    }
}
