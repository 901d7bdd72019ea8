//! Installment schedules and deterministic award simulation for
//! pooled lending circles.

pub mod award;
pub mod config;
pub mod engine;
pub mod error;
pub mod group;
pub mod installment;
pub mod ledger;
pub mod rng;
pub mod store;
pub mod types;
