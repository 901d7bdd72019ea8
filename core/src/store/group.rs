use super::{get_u32, PlanStore, DATE_FORMAT};
use crate::{error::PlanResult, group::GroupPlan};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

/// Raw row before the activation date is parsed.
struct GroupRow {
    plan: GroupPlan,
    activation_date: Option<String>,
}

impl GroupRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            plan: GroupPlan {
                group_id: row.get(0)?,
                name: row.get(1)?,
                capital: row.get(2)?,
                term_months: get_u32(row, 3)?,
                cohort_size: get_u32(row, 4)?,
                activation_date: None,
                viewer_order_number: row.get(6)?,
                viewer_awarded: row.get::<_, i32>(7)? != 0,
            },
            activation_date: row.get(5)?,
        })
    }

    fn into_plan(self) -> PlanResult<GroupPlan> {
        let mut plan = self.plan;
        plan.activation_date = self
            .activation_date
            .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
            .transpose()?;
        Ok(plan)
    }
}

const GROUP_COLUMNS: &str = "group_id, name, capital, term_months, cohort_size,
    activation_date, viewer_order_number, viewer_awarded";

impl PlanStore {
    // ── Groups ────────────────────────────────────────────────────

    /// Insert a group, or replace the stored record with the same id.
    pub fn upsert_group(&self, g: &GroupPlan) -> PlanResult<()> {
        g.validate()?;
        self.conn.execute(
            "INSERT INTO plan_group (
                group_id, name, capital, term_months, cohort_size,
                activation_date, viewer_order_number, viewer_awarded
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(group_id) DO UPDATE SET
                name = excluded.name,
                capital = excluded.capital,
                term_months = excluded.term_months,
                cohort_size = excluded.cohort_size,
                activation_date = excluded.activation_date,
                viewer_order_number = excluded.viewer_order_number,
                viewer_awarded = excluded.viewer_awarded",
            params![
                &g.group_id,
                &g.name,
                g.capital,
                g.term_months as i64,
                g.cohort_size as i64,
                g.activation_date.map(|d| d.format(DATE_FORMAT).to_string()),
                g.viewer_order_number,
                if g.viewer_awarded { 1 } else { 0 },
            ],
        )?;
        log::info!(
            "stored group {} ({} months, {} members)",
            g.group_id,
            g.term_months,
            g.cohort_size
        );
        Ok(())
    }

    pub fn group(&self, group_id: &str) -> PlanResult<Option<GroupPlan>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {GROUP_COLUMNS} FROM plan_group WHERE group_id = ?1"),
                params![group_id],
                GroupRow::from_row,
            )
            .optional()?;
        row.map(GroupRow::into_plan).transpose()
    }

    /// All groups, ordered by id.
    pub fn groups(&self) -> PlanResult<Vec<GroupPlan>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {GROUP_COLUMNS} FROM plan_group ORDER BY group_id ASC"))?;
        let rows = stmt
            .query_map([], GroupRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(GroupRow::into_plan).collect()
    }

    /// Flag the viewer as awarded in a group.
    pub fn mark_viewer_awarded(&self, group_id: &str) -> PlanResult<bool> {
        let changed = self.conn.execute(
            "UPDATE plan_group SET viewer_awarded = 1
             WHERE group_id = ?1 AND viewer_order_number IS NOT NULL",
            params![group_id],
        )?;
        Ok(changed > 0)
    }
}
