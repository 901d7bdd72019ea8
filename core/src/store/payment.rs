use super::{get_u32, PlanStore, DATE_FORMAT};
use crate::{
    error::{PlanError, PlanResult},
    group::Payment,
    types::Money,
};
use chrono::NaiveDate;
use rusqlite::params;
use uuid::Uuid;

impl PlanStore {
    // ── Payments ──────────────────────────────────────────────────

    /// Number of installments paid so far. Payments are always in order,
    /// so this is also the number of the last paid installment.
    pub fn paid_count(&self, group_id: &str) -> PlanResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM payment WHERE group_id = ?1",
            params![group_id],
            |row| get_u32(row, 0),
        )?;
        Ok(count)
    }

    /// Record payment of the next unpaid installment.
    pub fn record_payment(
        &self,
        group_id: &str,
        paid_on: NaiveDate,
        amount: Money,
    ) -> PlanResult<Payment> {
        let group = self.group(group_id)?.ok_or_else(|| PlanError::GroupNotFound {
            group_id: group_id.to_string(),
        })?;
        let paid = self.paid_count(group_id)?;
        if paid >= group.term_months {
            return Err(PlanError::PlanFullyPaid {
                group_id: group_id.to_string(),
                term_months: group.term_months,
            });
        }

        let payment = Payment {
            payment_id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            installment_number: paid + 1,
            paid_on,
            amount,
        };
        self.conn.execute(
            "INSERT INTO payment (payment_id, group_id, installment_number, paid_on, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &payment.payment_id,
                &payment.group_id,
                payment.installment_number as i64,
                payment.paid_on.format(DATE_FORMAT).to_string(),
                payment.amount,
            ],
        )?;
        log::info!(
            "group {group_id}: installment {} paid on {paid_on} ({amount:.2})",
            payment.installment_number
        );
        Ok(payment)
    }

    /// Payments for a group in installment order.
    pub fn payments(&self, group_id: &str) -> PlanResult<Vec<Payment>> {
        let mut stmt = self.conn.prepare(
            "SELECT payment_id, group_id, installment_number, paid_on, amount
             FROM payment WHERE group_id = ?1
             ORDER BY installment_number ASC",
        )?;
        let rows = stmt
            .query_map(params![group_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    get_u32(row, 2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(payment_id, group_id, installment_number, paid_on, amount)| -> PlanResult<Payment> {
                Ok(Payment {
                    payment_id,
                    group_id,
                    installment_number,
                    paid_on: NaiveDate::parse_from_str(&paid_on, DATE_FORMAT)?,
                    amount,
                })
            })
            .collect()
    }
}
