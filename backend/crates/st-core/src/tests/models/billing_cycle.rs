use crate::BillingCycle;

use std::str::FromStr;

use chrono::{TimeZone, Utc};

#[test]
fn test_billing_cycle_default() {
    assert_eq!(BillingCycle::default(), BillingCycle::Monthly);
}

#[test]
fn test_billing_cycle_from_str() {
    assert_eq!(
        BillingCycle::from_str("yearly").unwrap(),
        BillingCycle::Yearly
    );
    assert!(BillingCycle::from_str("daily").is_err());
}

#[test]
fn test_monthly_advance_clamps_to_month_end() {
    let jan_31 = Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap();

    let next = BillingCycle::Monthly.advance(jan_31).unwrap();

    assert_eq!(next, Utc.with_ymd_and_hms(2025, 2, 28, 9, 0, 0).unwrap());
}

#[test]
fn test_weekly_and_yearly_advance() {
    let start = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();

    assert_eq!(
        BillingCycle::Weekly.advance(start).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap()
    );
    assert_eq!(
        BillingCycle::Yearly.advance(start).unwrap(),
        Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap()
    );
}
