//! Plan ledger: installments merged with the award calendar.
//!
//! Installment k lines up with month index k - 1. Both inputs are pure
//! outputs of the generator and the simulator; the ledger only joins
//! and summarises them.

use crate::{
    award::{Award, AwardCalendar},
    group::GroupPlan,
    installment::{Installment, InstallmentStatus, Schedule},
    types::{round_cents, GroupId, Money, MonthIndex},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRow {
    pub installment: Installment,
    pub status: InstallmentStatus,
    pub awards: Vec<Award>,
}

impl LedgerRow {
    pub fn has_awards(&self) -> bool {
        !self.awards.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanView {
    pub group_id: GroupId,
    pub example: bool,
    pub paid_count: u32,
    pub rows: Vec<LedgerRow>,
    /// Month in which the viewer is awarded, when they are a member.
    pub viewer_award_month: Option<MonthIndex>,
}

impl PlanView {
    pub fn build(
        group: &GroupPlan,
        schedule: &Schedule,
        calendar: &AwardCalendar,
        paid_count: u32,
        today: NaiveDate,
    ) -> Self {
        let rows = schedule
            .iter()
            .enumerate()
            .map(|(month, installment)| LedgerRow {
                status: InstallmentStatus::derive(
                    installment.number,
                    paid_count,
                    &installment.due,
                    today,
                ),
                awards: calendar.month(month).to_vec(),
                installment: installment.clone(),
            })
            .collect();

        Self {
            group_id: group.group_id.clone(),
            example: schedule.is_example(),
            paid_count,
            rows,
            viewer_award_month: group
                .viewer_order_number
                .and_then(|n| calendar.award_month_of(n)),
        }
    }

    /// First row not yet paid.
    pub fn next_due(&self) -> Option<&LedgerRow> {
        self.rows
            .iter()
            .find(|r| r.status != InstallmentStatus::Paid)
    }

    pub fn overdue_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.status == InstallmentStatus::Overdue)
            .count()
    }
}

/// Per-member amounts collected to date, split by component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectedToDate {
    pub pure_quota: Money,
    pub admin_fee: Money,
    pub life_insurance: Money,
    pub subscription_right: Money,
    pub total: Money,
}

/// Financial transparency summary for a group at a point in its term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransparencyReport {
    pub group_id: GroupId,
    pub months_elapsed: u32,
    pub term_months: u32,
    pub members_awarded: usize,
    pub members_pending: usize,
    pub deserted_bids: usize,
    /// Cohort × pure quota: what the pool raises for awards each month.
    pub monthly_pool_collection: Money,
    /// Capital paid out to real winners so far.
    pub capital_disbursed: Money,
    pub collected_per_member: CollectedToDate,
}

impl TransparencyReport {
    pub fn build(
        group: &GroupPlan,
        schedule: &Schedule,
        calendar: &AwardCalendar,
        months_elapsed: u32,
    ) -> Self {
        let elapsed = months_elapsed.min(schedule.term_months);
        let awarded_so_far: Vec<&Award> = calendar
            .months()
            .iter()
            .take(elapsed as usize)
            .flatten()
            .collect();

        let members_awarded = awarded_so_far.iter().filter(|a| !a.is_placeholder()).count();
        let deserted_bids = awarded_so_far.iter().filter(|a| a.is_placeholder()).count();

        let mut collected = CollectedToDate::default();
        for installment in schedule.iter().take(elapsed as usize) {
            let b = &installment.breakdown;
            collected.pure_quota += b.pure_quota;
            collected.admin_fee += b.admin_fee;
            collected.life_insurance += b.life_insurance;
            collected.subscription_right += b.subscription_right.unwrap_or(0.0);
            collected.total += installment.total;
        }
        let collected_per_member = CollectedToDate {
            pure_quota: round_cents(collected.pure_quota),
            admin_fee: round_cents(collected.admin_fee),
            life_insurance: round_cents(collected.life_insurance),
            subscription_right: round_cents(collected.subscription_right),
            total: round_cents(collected.total),
        };

        let pure_quota = schedule
            .installment(1)
            .map(|i| i.breakdown.pure_quota)
            .unwrap_or(0.0);

        Self {
            group_id: group.group_id.clone(),
            months_elapsed: elapsed,
            term_months: schedule.term_months,
            members_awarded,
            members_pending: (group.cohort_size as usize).saturating_sub(members_awarded),
            deserted_bids,
            monthly_pool_collection: round_cents(f64::from(group.cohort_size) * pure_quota),
            capital_disbursed: round_cents(members_awarded as f64 * group.capital),
            collected_per_member,
        }
    }
}
