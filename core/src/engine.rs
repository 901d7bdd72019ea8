//! The plan desk, single entry point the surrounding application calls.
//!
//! RULES:
//!   - Schedules and award calendars are recomputed on every call;
//!     both are pure functions of the stored group and the config.
//!   - Only the store holds state (groups and payments).
//!   - The viewer's own award, when flagged, is placed by the simulator
//!     outside the normal draw.

use crate::{
    award::{self, AwardCalendar},
    config::PlanConfig,
    error::{PlanError, PlanResult},
    group::{GroupPlan, Payment},
    installment::{self, Schedule},
    ledger::{PlanView, TransparencyReport},
    store::PlanStore,
};
use chrono::NaiveDate;

pub struct PlanDesk {
    config: PlanConfig,
    store: PlanStore,
}

impl PlanDesk {
    pub fn new(config: PlanConfig, store: PlanStore) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config, store })
    }

    /// Desk over a migrated in-memory store with default config.
    /// Used by tests and the runner's scratch mode.
    pub fn build_test() -> PlanResult<Self> {
        let store = PlanStore::in_memory()?;
        store.migrate()?;
        Self::new(PlanConfig::default_test(), store)
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    pub fn register_group(&self, group: &GroupPlan) -> PlanResult<()> {
        self.store.upsert_group(group)
    }

    pub fn group(&self, group_id: &str) -> PlanResult<GroupPlan> {
        self.store
            .group(group_id)?
            .ok_or_else(|| PlanError::GroupNotFound {
                group_id: group_id.to_string(),
            })
    }

    pub fn schedule(&self, group_id: &str) -> PlanResult<Schedule> {
        let group = self.group(group_id)?;
        self.schedule_for(&group)
    }

    pub fn awards(&self, group_id: &str) -> PlanResult<AwardCalendar> {
        let group = self.group(group_id)?;
        self.awards_for(&group)
    }

    pub fn plan_view(&self, group_id: &str, today: NaiveDate) -> PlanResult<PlanView> {
        let group = self.group(group_id)?;
        let schedule = self.schedule_for(&group)?;
        let calendar = self.awards_for(&group)?;
        let paid = self.store.paid_count(group_id)?;
        Ok(PlanView::build(&group, &schedule, &calendar, paid, today))
    }

    /// Report as of the number of installments paid so far.
    pub fn transparency_report(&self, group_id: &str) -> PlanResult<TransparencyReport> {
        let group = self.group(group_id)?;
        let schedule = self.schedule_for(&group)?;
        let calendar = self.awards_for(&group)?;
        let paid = self.store.paid_count(group_id)?;
        Ok(TransparencyReport::build(&group, &schedule, &calendar, paid))
    }

    /// Pay the next unpaid installment at its scheduled total.
    pub fn pay_next(&self, group_id: &str, paid_on: NaiveDate) -> PlanResult<Payment> {
        let group = self.group(group_id)?;
        let schedule = self.schedule_for(&group)?;
        let next = self.store.paid_count(group_id)? + 1;
        let amount = schedule
            .installment(next)
            .map(|i| i.total)
            .ok_or_else(|| PlanError::PlanFullyPaid {
                group_id: group_id.to_string(),
                term_months: group.term_months,
            })?;
        self.store.record_payment(group_id, paid_on, amount)
    }

    /// Pay installments in order until `target` are paid (capped at the
    /// term). Already-paid installments are not paid again.
    pub fn pay_up_to(
        &self,
        group_id: &str,
        target: u32,
        paid_on: NaiveDate,
    ) -> PlanResult<Vec<Payment>> {
        let group = self.group(group_id)?;
        let target = target.min(group.term_months);
        let already = self.store.paid_count(group_id)?;
        (already..target)
            .map(|_| self.pay_next(group_id, paid_on))
            .collect()
    }

    fn schedule_for(&self, group: &GroupPlan) -> PlanResult<Schedule> {
        installment::generate(
            group.capital,
            group.term_months,
            group.activation_date,
            &self.config.fees,
        )
    }

    fn awards_for(&self, group: &GroupPlan) -> PlanResult<AwardCalendar> {
        award::simulate(
            &group.group_id,
            group.cohort_size,
            group.term_months,
            group.flagged_member(),
            &self.config.awards,
        )
    }
}
