use crate::{
    error::{PlanError, PlanResult},
    rng::GeneratorKind,
    types::Money,
};
use serde::{Deserialize, Serialize};

// ── Installment fees ───────────────────────────────────────────────

/// How the monthly life insurance premium is computed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LifeInsurance {
    /// Flat premium charged on every installment.
    Fixed { premium: Money },
    /// `rate` × pure-quota balance still outstanding after the installment.
    BalanceBased { rate: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeConfig {
    /// Administrative fee as a fraction of the pure quota, tax included.
    pub admin_fee_rate: f64,
    pub life_insurance: LifeInsurance,
    /// Total subscription right as a fraction of capital.
    pub subscription_right_rate: f64,
    /// Fraction of the term over which the subscription right is spread.
    /// Whole basis points only (e.g. 0.15, 0.1235).
    pub subscription_window: f64,
}

impl FeeConfig {
    pub fn validate(&self) -> PlanResult<()> {
        check_fraction("admin_fee_rate", self.admin_fee_rate)?;
        check_fraction("subscription_right_rate", self.subscription_right_rate)?;
        check_basis_point("subscription_window", self.subscription_window)?;
        match self.life_insurance {
            LifeInsurance::Fixed { premium } if !(premium.is_finite() && premium >= 0.0) => {
                Err(PlanError::InvalidConfig(format!(
                    "life insurance premium must be >= 0, got {premium}"
                )))
            }
            LifeInsurance::BalanceBased { rate } => check_fraction("life_insurance.rate", rate),
            LifeInsurance::Fixed { .. } => Ok(()),
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            admin_fee_rate: 0.10,
            life_insurance: LifeInsurance::Fixed { premium: 12.50 },
            subscription_right_rate: 0.05,
            subscription_window: 0.15,
        }
    }
}

// ── Award simulation ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwardConfig {
    /// Probability that a month's bid is deserted.
    pub desertion_probability: f64,
    /// Most deserted bids allowed over a whole run.
    pub max_desertions: u32,
    /// Position in the term (fraction) where an already-awarded viewer is placed.
    /// Whole basis points only.
    pub flagged_award_fraction: f64,
    #[serde(default)]
    pub generator: GeneratorKind,
}

impl AwardConfig {
    pub fn validate(&self) -> PlanResult<()> {
        check_fraction("desertion_probability", self.desertion_probability)?;
        check_basis_point("flagged_award_fraction", self.flagged_award_fraction)
    }
}

impl Default for AwardConfig {
    fn default() -> Self {
        Self {
            desertion_probability: 0.15,
            max_desertions: 3,
            flagged_award_fraction: 0.85,
            generator: GeneratorKind::Sine,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanConfig {
    pub fees: FeeConfig,
    pub awards: AwardConfig,
}

impl PlanConfig {
    /// Load from the data/ directory.
    /// In tests, use PlanConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/plan/plan_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: PlanConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> PlanResult<()> {
        self.fees.validate()?;
        self.awards.validate()
    }
}

fn check_fraction(field: &str, value: f64) -> PlanResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlanError::InvalidConfig(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}

/// Term fractions are applied in basis points; anything finer would be
/// silently rounded, so it is rejected.
fn check_basis_point(field: &str, value: f64) -> PlanResult<()> {
    check_fraction(field, value)?;
    let scaled = value * 10_000.0;
    if (scaled - scaled.round()).abs() > 1e-6 {
        return Err(PlanError::InvalidConfig(format!(
            "{field} must be a whole number of basis points, got {value}"
        )));
    }
    Ok(())
}

/// Convert a fraction to whole basis points so that products such as
/// `60 × 0.15` land on exact integers.
pub(crate) fn basis_points(fraction: f64) -> u64 {
    (fraction * 10_000.0).round() as u64
}
