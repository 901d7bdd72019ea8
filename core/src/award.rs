//! Deterministic award simulator.
//!
//! Given a group id, cohort size and term, lays out which order numbers
//! are awarded in each month. The group id seeds the generator, so every
//! caller that simulates the same group sees the same calendar.
//!
//! MONTH LAYOUT:
//!   month 0            no awards
//!   months 1..=term-2  one lottery, then one bid (or a deserted bid)
//!   month term-1       every member still in the pool as extra lottery,
//!                      plus one negative placeholder per deserted bid
//!
//! A flagged member (the viewer, already awarded) is pulled out of the
//! pool and placed as a lottery award at floor(term × fraction).

use crate::{
    config::{basis_points, AwardConfig},
    error::{PlanError, PlanResult},
    rng::{shuffle, DrawSource},
    types::{MonthIndex, OrderNumber},
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    Lottery,
    Bid,
    ExtraLottery,
}

impl AwardKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lottery => "lottery",
            Self::Bid => "bid",
            Self::ExtraLottery => "extra_lottery",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Award {
    pub kind: AwardKind,
    pub order_number: OrderNumber,
}

impl Award {
    pub fn new(kind: AwardKind, order_number: OrderNumber) -> Self {
        Self { kind, order_number }
    }

    /// Deserted-bid slot with no real winner.
    pub fn is_placeholder(&self) -> bool {
        self.order_number < 0
    }
}

/// Awards per month, indexed by 0-based month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwardCalendar {
    pub group_id: String,
    pub cohort_size: u32,
    months: Vec<Vec<Award>>,
}

impl AwardCalendar {
    pub fn months(&self) -> &[Vec<Award>] {
        &self.months
    }

    pub fn month(&self, index: MonthIndex) -> &[Award] {
        self.months.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn term_months(&self) -> usize {
        self.months.len()
    }

    pub fn into_months(self) -> Vec<Vec<Award>> {
        self.months
    }

    /// Real order numbers awarded across the whole term, in month order.
    pub fn awarded_order_numbers(&self) -> Vec<OrderNumber> {
        self.months
            .iter()
            .flatten()
            .filter(|a| !a.is_placeholder())
            .map(|a| a.order_number)
            .collect()
    }

    /// Count of deserted-bid placeholders.
    pub fn deserted_bids(&self) -> usize {
        self.months
            .iter()
            .flatten()
            .filter(|a| a.is_placeholder())
            .count()
    }

    /// Month in which a member is awarded, if any.
    pub fn award_month_of(&self, order_number: OrderNumber) -> Option<MonthIndex> {
        self.months
            .iter()
            .position(|awards| awards.iter().any(|a| a.order_number == order_number))
    }
}

/// Month the flagged member is forced into: floor(term × fraction),
/// clamped to [1, term - 1].
pub fn flagged_award_month(term_months: u32, fraction: f64) -> MonthIndex {
    let raw = u64::from(term_months) * basis_points(fraction) / 10_000;
    let last = u64::from(term_months.saturating_sub(1)).max(1);
    raw.clamp(1, last) as MonthIndex
}

/// Simulate the award calendar for a group.
pub fn simulate(
    group_id: &str,
    cohort_size: u32,
    term_months: u32,
    flagged: Option<OrderNumber>,
    config: &AwardConfig,
) -> PlanResult<AwardCalendar> {
    if cohort_size == 0 {
        return Err(PlanError::InvalidCohort { cohort_size });
    }
    if term_months < 2 {
        return Err(PlanError::TermTooShort { term_months });
    }
    if let Some(order_number) = flagged {
        if order_number < 1 || order_number > i64::from(cohort_size) {
            return Err(PlanError::InvalidFlaggedMember {
                order_number,
                cohort_size,
            });
        }
    }
    config.validate()?;

    let mut rng = config.generator.for_group(group_id);
    let months = draw_months(rng.as_mut(), cohort_size, term_months, flagged, config);

    Ok(AwardCalendar {
        group_id: group_id.to_string(),
        cohort_size,
        months,
    })
}

fn draw_months(
    rng: &mut dyn DrawSource,
    cohort_size: u32,
    term_months: u32,
    flagged: Option<OrderNumber>,
    config: &AwardConfig,
) -> Vec<Vec<Award>> {
    let term = term_months as usize;
    let final_month = term - 1;

    let mut pool: Vec<OrderNumber> = (1..=i64::from(cohort_size))
        .filter(|n| Some(*n) != flagged)
        .collect();
    shuffle(rng, &mut pool);
    let mut pool: VecDeque<OrderNumber> = pool.into();

    let flagged_month =
        flagged.map(|n| (n, flagged_award_month(term_months, config.flagged_award_fraction)));
    let mut months: Vec<Vec<Award>> = vec![Vec::new(); term];
    let mut desertions: u32 = 0;
    let mut exhausted = false;

    for (month, awards) in months.iter_mut().enumerate().take(final_month).skip(1) {
        if let Some((n, at)) = flagged_month {
            if at == month {
                awards.push(Award::new(AwardKind::Lottery, n));
            }
        }

        // Flagged member was filtered out before the shuffle.
        if let Some(winner) = pop_candidate(&mut pool, flagged) {
            awards.push(Award::new(AwardKind::Lottery, winner));
        }

        if pool.is_empty() {
            if !exhausted {
                log::warn!("award pool exhausted at month {month}; later months under-filled");
                exhausted = true;
            }
            continue;
        }

        if desertions < config.max_desertions && rng.chance(config.desertion_probability) {
            desertions += 1;
            log::debug!("bid deserted at month {month} ({desertions}/{})", config.max_desertions);
            continue;
        }

        if let Some(winner) = pop_candidate(&mut pool, flagged) {
            awards.push(Award::new(AwardKind::Bid, winner));
        }
    }

    let last = &mut months[final_month];
    if let Some((n, at)) = flagged_month {
        if at == final_month {
            last.push(Award::new(AwardKind::Lottery, n));
        }
    }
    last.extend(pool.drain(..).map(|n| Award::new(AwardKind::ExtraLottery, n)));
    last.extend((1..=i64::from(desertions)).map(|k| Award::new(AwardKind::ExtraLottery, -k)));

    log::debug!(
        "simulated {term} months for cohort {cohort_size} via {}: {desertions} deserted bids",
        rng.name()
    );
    months
}

fn pop_candidate(
    pool: &mut VecDeque<OrderNumber>,
    flagged: Option<OrderNumber>,
) -> Option<OrderNumber> {
    while let Some(candidate) = pool.pop_front() {
        if Some(candidate) != flagged {
            return Some(candidate);
        }
    }
    None
}
