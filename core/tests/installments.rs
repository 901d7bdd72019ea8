//! Installment schedule generator tests.

use chrono::NaiveDate;
use circle_core::{
    config::{FeeConfig, LifeInsurance},
    error::PlanError,
    installment::{generate, DueDate},
};

#[test]
fn every_installment_total_is_the_sum_of_its_breakdown() {
    let fees = FeeConfig::default();
    for (capital, term) in [(20_000.0, 60), (7_500.0, 36), (12_345.67, 17), (100.0, 3)] {
        let schedule = generate(capital, term, None, &fees).unwrap();
        for i in schedule.iter() {
            let b = &i.breakdown;
            let sum = b.pure_quota + b.admin_fee + b.life_insurance + b.subscription_right.unwrap_or(0.0);
            assert!(
                (sum - i.total).abs() < 1e-6,
                "installment {} of {capital}/{term}: parts {sum} != total {}",
                i.number,
                i.total
            );
        }
    }
}

#[test]
fn subscription_right_only_inside_initial_window() {
    let schedule = generate(20_000.0, 60, None, &FeeConfig::default()).unwrap();

    for i in schedule.iter() {
        let subs = i.breakdown.subscription_right;
        if i.number <= 9 {
            assert!(
                subs.is_some_and(|s| s > 0.0),
                "installment {} should carry the subscription right",
                i.number
            );
        } else {
            assert_eq!(subs, None, "installment {} should not carry it", i.number);
        }
    }
    assert_eq!(schedule.subscription_window(), 9);
}

#[test]
fn example_schedule_for_twenty_thousand_over_sixty_months() {
    let schedule = generate(20_000.0, 60, None, &FeeConfig::default()).unwrap();

    assert_eq!(schedule.len(), 60);
    assert!(schedule.is_example());

    let first = schedule.installment(1).unwrap();
    assert_eq!(first.breakdown.pure_quota, 333.33);
    assert_eq!(first.breakdown.admin_fee, 33.33);
    assert_eq!(first.due, DueDate::Example { month: 1 });

    let in_window = first.total;
    let after_window = schedule.installment(10).unwrap().total;
    for i in schedule.iter() {
        let expected = if i.number <= 9 { in_window } else { after_window };
        assert_eq!(i.total, expected, "installment {} total drifted", i.number);
    }

    // 1000 of subscription right split over 9 installments.
    let subs = first.breakdown.subscription_right.unwrap();
    assert_eq!(subs, 111.11);
    assert!((in_window - after_window - subs).abs() < 1e-6);
}

#[test]
fn calendar_dates_advance_one_month_at_a_time() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let schedule = generate(12_000.0, 24, Some(start), &FeeConfig::default()).unwrap();

    assert!(!schedule.is_example());
    assert_eq!(
        schedule.installment(1).unwrap().due.date(),
        NaiveDate::from_ymd_opt(2025, 2, 15)
    );
    assert_eq!(
        schedule.installment(24).unwrap().due.date(),
        NaiveDate::from_ymd_opt(2027, 1, 15)
    );

    let dates: Vec<NaiveDate> = schedule.iter().filter_map(|i| i.due.date()).collect();
    assert_eq!(dates.len(), 24);
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn balance_based_life_insurance_decreases_to_zero() {
    let fees = FeeConfig {
        life_insurance: LifeInsurance::BalanceBased { rate: 0.001 },
        ..FeeConfig::default()
    };
    let schedule = generate(20_000.0, 60, None, &fees).unwrap();
    let premiums: Vec<f64> = schedule.iter().map(|i| i.breakdown.life_insurance).collect();

    assert!(
        premiums.windows(2).all(|w| w[0] > w[1]),
        "balance-based premiums must strictly decrease: {premiums:?}"
    );
    assert_eq!(premiums[0], 19.67);
    assert_eq!(*premiums.last().unwrap(), 0.0);
}

#[test]
fn numbers_are_one_based_and_contiguous() {
    let schedule = generate(5_000.0, 10, None, &FeeConfig::default()).unwrap();
    let numbers: Vec<u32> = schedule.iter().map(|i| i.number).collect();
    assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
    assert!(schedule.installment(0).is_none());
    assert!(schedule.installment(11).is_none());
}

#[test]
fn zero_subscription_rate_leaves_field_absent() {
    let fees = FeeConfig {
        subscription_right_rate: 0.0,
        ..FeeConfig::default()
    };
    let schedule = generate(20_000.0, 60, None, &fees).unwrap();
    assert_eq!(schedule.subscription_window(), 0);
}

#[test]
fn non_positive_inputs_are_rejected() {
    let fees = FeeConfig::default();
    assert!(matches!(
        generate(0.0, 12, None, &fees),
        Err(PlanError::InvalidCapital { .. })
    ));
    assert!(matches!(
        generate(-500.0, 12, None, &fees),
        Err(PlanError::InvalidCapital { .. })
    ));
    assert!(matches!(
        generate(f64::NAN, 12, None, &fees),
        Err(PlanError::InvalidCapital { .. })
    ));
    assert!(matches!(
        generate(1_000.0, 0, None, &fees),
        Err(PlanError::InvalidTerm { term_months: 0 })
    ));
}

#[test]
fn invalid_fee_config_is_rejected() {
    let fees = FeeConfig {
        admin_fee_rate: 1.5,
        ..FeeConfig::default()
    };
    assert!(matches!(
        generate(1_000.0, 12, None, &fees),
        Err(PlanError::InvalidConfig(_))
    ));
}

#[test]
fn activation_at_calendar_limit_is_rejected() {
    assert!(matches!(
        generate(1_000.0, 12, Some(NaiveDate::MAX), &FeeConfig::default()),
        Err(PlanError::DateOutOfRange { number: 1 })
    ));
}

#[test]
fn window_finer_than_a_basis_point_is_rejected() {
    let fees = FeeConfig {
        subscription_window: 0.12345,
        ..FeeConfig::default()
    };
    assert!(matches!(
        generate(1_000.0, 12, None, &fees),
        Err(PlanError::InvalidConfig(_))
    ));
}
