//! Installment schedule generator.
//!
//! A schedule is a pure function of (capital, term, activation date, fees).
//! Callers recompute it freely; nothing here is cached or mutated.
//!
//! Each installment is split into:
//!   - pure quota         capital / term, constant
//!   - admin fee          pure quota × admin_fee_rate, constant, tax included
//!   - life insurance     fixed premium, or a rate on the outstanding balance
//!   - subscription right capital × rate, spread over the first
//!                        ceil(term × window) installments only

use crate::{
    config::{basis_points, FeeConfig, LifeInsurance},
    error::{PlanError, PlanResult},
    types::{round_cents, Money},
};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// When an installment falls due.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DueDate {
    /// Real calendar date for an active plan.
    Calendar { date: NaiveDate },
    /// Illustrative "Month k" for a plan that has not been activated.
    Example { month: u32 },
}

impl DueDate {
    pub fn is_example(&self) -> bool {
        matches!(self, Self::Example { .. })
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Calendar { date } => Some(*date),
            Self::Example { .. } => None,
        }
    }
}

impl std::fmt::Display for DueDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar { date } => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Example { month } => write!(f, "Month {month}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Breakdown {
    pub pure_quota: Money,
    pub admin_fee: Money,
    pub life_insurance: Money,
    /// Present only inside the initial subscription window.
    pub subscription_right: Option<Money>,
}

impl Breakdown {
    pub fn sum(&self) -> Money {
        self.pure_quota
            + self.admin_fee
            + self.life_insurance
            + self.subscription_right.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Installment {
    pub number: u32,
    pub due: DueDate,
    pub breakdown: Breakdown,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Paid,
    Pending,
    Overdue,
    Future,
}

impl InstallmentStatus {
    /// Derive an installment's status from how many installments have
    /// been paid (in order) and today's date.
    pub fn derive(number: u32, paid_count: u32, due: &DueDate, today: NaiveDate) -> Self {
        if number <= paid_count {
            return Self::Paid;
        }
        if due.date().is_some_and(|date| date < today) {
            return Self::Overdue;
        }
        if number == paid_count + 1 {
            Self::Pending
        } else {
            Self::Future
        }
    }
}

/// An ordered, immutable installment plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub capital: Money,
    pub term_months: u32,
    pub activation_date: Option<NaiveDate>,
    pub installments: Vec<Installment>,
}

impl Schedule {
    /// True when due dates are illustrative rather than real.
    pub fn is_example(&self) -> bool {
        self.activation_date.is_none()
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Installment> {
        self.installments.iter()
    }

    /// Look up an installment by its 1-based number.
    pub fn installment(&self, number: u32) -> Option<&Installment> {
        number
            .checked_sub(1)
            .and_then(|i| self.installments.get(i as usize))
    }

    /// Number of installments carrying a subscription right.
    pub fn subscription_window(&self) -> usize {
        self.installments
            .iter()
            .filter(|i| i.breakdown.subscription_right.is_some())
            .count()
    }

    /// Sum of every installment total over the whole term.
    pub fn total_cost(&self) -> Money {
        round_cents(self.installments.iter().map(|i| i.total).sum())
    }
}

/// Number of leading installments that carry the subscription right.
pub fn subscription_window_len(term_months: u32, window: f64) -> u32 {
    let bp = basis_points(window);
    let scaled = u64::from(term_months) * bp;
    scaled.div_ceil(10_000).min(u64::from(term_months)) as u32
}

/// Generate the installment schedule for a plan.
pub fn generate(
    capital: Money,
    term_months: u32,
    activation_date: Option<NaiveDate>,
    fees: &FeeConfig,
) -> PlanResult<Schedule> {
    if !(capital.is_finite() && capital > 0.0) {
        return Err(PlanError::InvalidCapital { capital });
    }
    if term_months == 0 {
        return Err(PlanError::InvalidTerm { term_months });
    }
    fees.validate()?;

    let term = f64::from(term_months);
    let pure_quota = round_cents(capital / term);
    let admin_fee = round_cents(pure_quota * fees.admin_fee_rate);

    let window = subscription_window_len(term_months, fees.subscription_window);
    let subscription_share = if window > 0 && fees.subscription_right_rate > 0.0 {
        Some(round_cents(
            capital * fees.subscription_right_rate / f64::from(window),
        ))
    } else {
        None
    };

    let mut installments = Vec::with_capacity(term_months as usize);
    for number in 1..=term_months {
        let due = match activation_date {
            Some(start) => DueDate::Calendar {
                date: start
                    .checked_add_months(Months::new(number))
                    .ok_or(PlanError::DateOutOfRange { number })?,
            },
            None => DueDate::Example { month: number },
        };

        let life_insurance = match fees.life_insurance {
            LifeInsurance::Fixed { premium } => round_cents(premium),
            LifeInsurance::BalanceBased { rate } => {
                let outstanding = capital * f64::from(term_months - number) / term;
                round_cents(outstanding * rate)
            }
        };

        let breakdown = Breakdown {
            pure_quota,
            admin_fee,
            life_insurance,
            subscription_right: subscription_share.filter(|_| number <= window),
        };

        installments.push(Installment {
            number,
            due,
            total: round_cents(breakdown.sum()),
            breakdown,
        });
    }

    Ok(Schedule {
        capital,
        term_months,
        activation_date,
        installments,
    })
}
