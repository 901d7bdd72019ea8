//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The desk calls store methods; it never executes SQL directly.
//! The store is passed explicitly to whatever needs it: there is
//! no ambient group state.

use crate::error::PlanResult;
use rusqlite::{types::Type, Connection, Row};

mod group;
mod payment;

pub struct PlanStore {
    conn: Connection,
}

impl PlanStore {
    /// Open (or create) the plan database at `path`.
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PlanResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PlanResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_groups.sql"))?;
        Ok(())
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read an INTEGER column that must fit a u32 (terms, cohort sizes,
/// installment numbers). Out-of-range values are conversion errors.
fn get_u32(row: &Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    let raw: i64 = row.get(idx)?;
    u32::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}
