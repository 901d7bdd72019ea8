//! Award simulator tests.

use circle_core::{
    award::{flagged_award_month, simulate, AwardCalendar, AwardKind},
    config::AwardConfig,
    error::PlanError,
    rng::GeneratorKind,
};
use std::collections::HashSet;

fn assert_full_coverage(calendar: &AwardCalendar, cohort: u32) {
    let awarded = calendar.awarded_order_numbers();
    let unique: HashSet<i64> = awarded.iter().copied().collect();
    assert_eq!(
        awarded.len(),
        unique.len(),
        "an order number was awarded twice: {awarded:?}"
    );
    assert_eq!(
        unique,
        (1..=i64::from(cohort)).collect::<HashSet<_>>(),
        "awards do not cover the cohort exactly"
    );
}

#[test]
fn forty_eight_member_group_is_fully_awarded() {
    let calendar = simulate("GR-002", 48, 48, None, &AwardConfig::default()).unwrap();

    assert_eq!(calendar.term_months(), 48);
    assert!(calendar.month(0).is_empty(), "month 0 must be empty");
    assert_full_coverage(&calendar, 48);
}

#[test]
fn month_zero_is_always_empty() {
    for kind in [GeneratorKind::Sine, GeneratorKind::Pcg] {
        let config = AwardConfig { generator: kind, ..AwardConfig::default() };
        for (cohort, term) in [(10, 2), (48, 48), (120, 60), (5, 12), (200, 24)] {
            let calendar = simulate("GR-100", cohort, term, None, &config).unwrap();
            assert!(
                calendar.month(0).is_empty(),
                "month 0 had awards for cohort {cohort} term {term}"
            );
        }
    }
}

#[test]
fn coverage_holds_across_cohort_sizes() {
    let config = AwardConfig::default();
    for (group_id, cohort, term) in [
        ("GR-A", 24, 12),
        ("GR-B", 100, 40),
        ("GR-C", 7, 20),
        ("GR-D", 1, 6),
        ("GR-E", 60, 60),
    ] {
        let calendar = simulate(group_id, cohort, term, None, &config).unwrap();
        assert_full_coverage(&calendar, cohort);
    }
}

#[test]
fn regular_months_hold_one_lottery_then_one_bid() {
    let config = AwardConfig {
        desertion_probability: 0.0,
        ..AwardConfig::default()
    };
    let calendar = simulate("GR-004", 48, 12, None, &config).unwrap();

    for month in 1..=10 {
        let kinds: Vec<AwardKind> = calendar.month(month).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AwardKind::Lottery, AwardKind::Bid], "month {month}");
    }
    // 48 members − 20 regular awards swept into the last month.
    let last = calendar.month(11);
    assert_eq!(last.len(), 28);
    assert!(last.iter().all(|a| a.kind == AwardKind::ExtraLottery));
    assert_eq!(calendar.deserted_bids(), 0);
}

#[test]
fn desertions_respect_the_cap_and_become_final_placeholders() {
    let config = AwardConfig {
        desertion_probability: 1.0,
        max_desertions: 3,
        ..AwardConfig::default()
    };
    let calendar = simulate("GR-005", 48, 48, None, &config).unwrap();

    assert_eq!(calendar.deserted_bids(), 3);
    // The first three regular months lose their bid.
    for month in 1..=3 {
        let kinds: Vec<AwardKind> = calendar.month(month).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AwardKind::Lottery], "month {month}");
    }

    let placeholders: Vec<i64> = calendar
        .month(47)
        .iter()
        .filter(|a| a.is_placeholder())
        .map(|a| a.order_number)
        .collect();
    assert_eq!(placeholders, vec![-1, -2, -3]);
    for month in 0..47 {
        assert!(calendar.month(month).iter().all(|a| !a.is_placeholder()));
    }
    assert_full_coverage(&calendar, 48);
}

#[test]
fn default_desertions_never_exceed_cap() {
    let config = AwardConfig::default();
    for n in 0..50 {
        let calendar = simulate(&format!("GR-{n:03}"), 96, 48, None, &config).unwrap();
        assert!(calendar.deserted_bids() <= config.max_desertions as usize);
    }
}

#[test]
fn flagged_member_is_placed_late_and_only_once() {
    let config = AwardConfig::default();
    let calendar = simulate("GR-010", 40, 20, Some(7), &config).unwrap();

    assert_eq!(flagged_award_month(20, 0.85), 17);
    assert_eq!(calendar.award_month_of(7), Some(17));

    let first = calendar.month(17)[0];
    assert_eq!(first.kind, AwardKind::Lottery);
    assert_eq!(first.order_number, 7);

    let sevens = calendar
        .awarded_order_numbers()
        .into_iter()
        .filter(|n| *n == 7)
        .count();
    assert_eq!(sevens, 1);
    assert_full_coverage(&calendar, 40);
}

#[test]
fn flagged_member_in_two_month_plan_lands_in_final_month() {
    let calendar = simulate("GR-011", 6, 2, Some(3), &AwardConfig::default()).unwrap();

    assert!(calendar.month(0).is_empty());
    let last = calendar.month(1);
    assert_eq!(last[0].kind, AwardKind::Lottery);
    assert_eq!(last[0].order_number, 3);
    assert_eq!(last.len(), 6);
    assert_full_coverage(&calendar, 6);
}

#[test]
fn flagged_month_is_clamped_into_the_term() {
    assert_eq!(flagged_award_month(2, 0.85), 1);
    assert_eq!(flagged_award_month(3, 0.0), 1);
    assert_eq!(flagged_award_month(10, 1.0), 9);
    assert_eq!(flagged_award_month(60, 0.85), 51);
}

#[test]
fn small_cohort_under_fills_without_duplicates() {
    let _ = env_logger::builder().is_test(true).try_init();
    let calendar = simulate("GR-SMALL", 5, 12, None, &AwardConfig::default()).unwrap();

    let regular: usize = (1..11).map(|m| calendar.month(m).len()).sum();
    assert!(regular <= 5);
    assert_full_coverage(&calendar, 5);
}

#[test]
fn invalid_inputs_are_rejected() {
    let config = AwardConfig::default();
    assert!(matches!(
        simulate("GR-1", 0, 12, None, &config),
        Err(PlanError::InvalidCohort { cohort_size: 0 })
    ));
    assert!(matches!(
        simulate("GR-1", 10, 1, None, &config),
        Err(PlanError::TermTooShort { term_months: 1 })
    ));
    assert!(matches!(
        simulate("GR-1", 10, 0, None, &config),
        Err(PlanError::TermTooShort { term_months: 0 })
    ));
    assert!(matches!(
        simulate("GR-1", 10, 12, Some(0), &config),
        Err(PlanError::InvalidFlaggedMember { .. })
    ));
    assert!(matches!(
        simulate("GR-1", 10, 12, Some(11), &config),
        Err(PlanError::InvalidFlaggedMember { .. })
    ));

    let bad = AwardConfig {
        desertion_probability: -0.1,
        ..AwardConfig::default()
    };
    assert!(matches!(
        simulate("GR-1", 10, 12, None, &bad),
        Err(PlanError::InvalidConfig(_))
    ));
}
