use crate::types::{GroupId, OrderNumber};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Invalid capital: {capital} (must be a positive, finite amount)")]
    InvalidCapital { capital: f64 },

    #[error("Invalid term: {term_months} months (must be > 0)")]
    InvalidTerm { term_months: u32 },

    #[error("Term of {term_months} months is too short to simulate awards (minimum 2)")]
    TermTooShort { term_months: u32 },

    #[error("Invalid cohort size: {cohort_size} (must be > 0)")]
    InvalidCohort { cohort_size: u32 },

    #[error("Flagged member {order_number} is outside the cohort 1..={cohort_size}")]
    InvalidFlaggedMember { order_number: OrderNumber, cohort_size: u32 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Due date for installment {number} is out of calendar range")]
    DateOutOfRange { number: u32 },

    #[error("Group '{group_id}' not found")]
    GroupNotFound { group_id: GroupId },

    #[error("Group '{group_id}' has already paid all {term_months} installments")]
    PlanFullyPaid { group_id: GroupId, term_months: u32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
