//! Group/plan record consumed by the core.

use crate::{
    error::{PlanError, PlanResult},
    types::{GroupId, Money, OrderNumber},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupPlan {
    pub group_id: GroupId,
    pub name: String,
    pub capital: Money,
    pub term_months: u32,
    pub cohort_size: u32,
    /// None while the group is still filling up.
    pub activation_date: Option<NaiveDate>,
    /// The viewing user's position, when they are a member.
    pub viewer_order_number: Option<OrderNumber>,
    pub viewer_awarded: bool,
}

impl GroupPlan {
    pub fn is_active(&self) -> bool {
        self.activation_date.is_some()
    }

    pub fn is_member(&self) -> bool {
        self.viewer_order_number.is_some()
    }

    /// Order number the simulator must place outside the normal draw:
    /// the viewer, when they are a member and already awarded.
    pub fn flagged_member(&self) -> Option<OrderNumber> {
        self.viewer_order_number.filter(|_| self.viewer_awarded)
    }

    pub fn validate(&self) -> PlanResult<()> {
        if !(self.capital.is_finite() && self.capital > 0.0) {
            return Err(PlanError::InvalidCapital { capital: self.capital });
        }
        if self.term_months == 0 {
            return Err(PlanError::InvalidTerm { term_months: self.term_months });
        }
        if self.cohort_size == 0 {
            return Err(PlanError::InvalidCohort { cohort_size: self.cohort_size });
        }
        if let Some(order_number) = self.viewer_order_number {
            if order_number < 1 || order_number > i64::from(self.cohort_size) {
                return Err(PlanError::InvalidFlaggedMember {
                    order_number,
                    cohort_size: self.cohort_size,
                });
            }
        }
        Ok(())
    }
}

/// A recorded installment payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub payment_id: String,
    pub group_id: GroupId,
    pub installment_number: u32,
    pub paid_on: NaiveDate,
    pub amount: Money,
}
