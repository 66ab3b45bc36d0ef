//! Payment allocation
//!
//! Splits an incoming payment across a customer's open bills using an
//! oldest-bill-first waterfall: each bill absorbs up to its pending
//! balance, the remainder spills to the next bill.

use fieldbill_core::models::{Bill, PaymentAllocation};
use fieldbill_core::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

/// Allocate a payment across open bills, oldest first.
///
/// `open_bills` must exclude CLOSED bills and be sorted by `date`
/// ascending; the allocator walks them in the given order and does not
/// re-sort. Bills with a zero pending balance are skipped, so no
/// zero-amount allocation is ever produced. Any remainder left after the
/// last bill is dropped without error.
///
/// Returns one allocation per bill touched, in traversal order, or
/// `NoOpenBills` when the input is empty.
pub fn allocate(
    amount: Decimal,
    customer_id: Uuid,
    open_bills: &[Bill],
) -> AppResult<Vec<PaymentAllocation>> {
    if amount < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "payment amount must be non-negative, got {}",
            amount
        )));
    }

    if open_bills.is_empty() {
        return Err(AppError::NoOpenBills(customer_id.to_string()));
    }

    debug_assert!(
        open_bills.windows(2).all(|w| w[0].date <= w[1].date),
        "open bills must be sorted by date ascending"
    );

    let mut allocations = Vec::new();
    let mut remaining = amount;

    for bill in open_bills {
        if remaining <= Decimal::ZERO {
            break;
        }

        if bill.amount_pending <= Decimal::ZERO {
            continue;
        }

        let slice = remaining.min(bill.amount_pending);
        remaining -= slice;

        debug!(bill_id = %bill.id, %slice, %remaining, "allocated payment slice");

        allocations.push(PaymentAllocation {
            bill_id: bill.id,
            customer_id,
            amount: slice,
        });
    }

    if remaining > Decimal::ZERO {
        // Overpayment beyond all open debt is dropped, matching the
        // established behavior of the payment flow.
        warn!(%customer_id, %remaining, "payment exceeds open debt, remainder dropped");
    }

    Ok(allocations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fieldbill_core::models::BillStatus;
    use rust_decimal_macros::dec;

    fn bill_on_day(day: u32, pending: Decimal) -> Bill {
        Bill {
            date: Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap(),
            amount: pending,
            amount_pending: pending,
            status: if pending == Decimal::ZERO {
                BillStatus::Closed
            } else {
                BillStatus::NotPaid
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_waterfall_spills_to_next_bill() {
        // Pending [30, 50], payment 40: 30 to the oldest, 10 spills over
        let bills = vec![bill_on_day(1, dec!(30)), bill_on_day(2, dec!(50))];
        let allocations = allocate(dec!(40), Uuid::new_v4(), &bills).unwrap();

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].bill_id, bills[0].id);
        assert_eq!(allocations[0].amount, dec!(30));
        assert_eq!(allocations[1].bill_id, bills[1].id);
        assert_eq!(allocations[1].amount, dec!(10));
    }

    #[test]
    fn test_exact_payment_closes_single_bill() {
        let bills = vec![bill_on_day(1, dec!(30)), bill_on_day(2, dec!(50))];
        let allocations = allocate(dec!(30), Uuid::new_v4(), &bills).unwrap();

        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].amount, dec!(30));
    }

    #[test]
    fn test_overpayment_remainder_dropped() {
        // Pending [20], payment 50: one allocation of 20, no error
        let bills = vec![bill_on_day(1, dec!(20))];
        let allocations = allocate(dec!(50), Uuid::new_v4(), &bills).unwrap();

        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].amount, dec!(20));
    }

    #[test]
    fn test_no_open_bills_is_an_error() {
        let result = allocate(dec!(10), Uuid::new_v4(), &[]);
        assert!(matches!(result, Err(AppError::NoOpenBills(_))));
    }

    #[test]
    fn test_zero_pending_bills_skipped() {
        let bills = vec![
            bill_on_day(1, dec!(0)),
            bill_on_day(2, dec!(25)),
            bill_on_day(3, dec!(25)),
        ];
        let allocations = allocate(dec!(30), Uuid::new_v4(), &bills).unwrap();

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].bill_id, bills[1].id);
        assert_eq!(allocations[0].amount, dec!(25));
        assert_eq!(allocations[1].amount, dec!(5));
    }

    #[test]
    fn test_zero_amount_payment_allocates_nothing() {
        let bills = vec![bill_on_day(1, dec!(30))];
        let allocations = allocate(dec!(0), Uuid::new_v4(), &bills).unwrap();
        assert!(allocations.is_empty());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let bills = vec![bill_on_day(1, dec!(30))];
        let result = allocate(dec!(-5), Uuid::new_v4(), &bills);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_conservation() {
        // Sum of allocations never exceeds the payment or the open debt
        let bills = vec![
            bill_on_day(1, dec!(12.50)),
            bill_on_day(2, dec!(7.25)),
            bill_on_day(3, dec!(40)),
        ];
        let open_debt: Decimal = bills.iter().map(|b| b.amount_pending).sum();

        for payment in [dec!(0), dec!(5), dec!(19.75), dec!(59.75), dec!(100)] {
            let allocations = allocate(payment, Uuid::new_v4(), &bills).unwrap();
            let allocated: Decimal = allocations.iter().map(|a| a.amount).sum();

            assert!(allocated <= payment);
            assert!(allocated <= open_debt);
            assert_eq!(allocated, payment.min(open_debt));
        }
    }

    #[test]
    fn test_allocation_preserves_traversal_order() {
        let bills = vec![
            bill_on_day(3, dec!(10)),
            bill_on_day(5, dec!(10)),
            bill_on_day(9, dec!(10)),
        ];
        let allocations = allocate(dec!(30), Uuid::new_v4(), &bills).unwrap();

        let ids: Vec<Uuid> = allocations.iter().map(|a| a.bill_id).collect();
        let expected: Vec<Uuid> = bills.iter().map(|b| b.id).collect();
        assert_eq!(ids, expected);
    }
}
