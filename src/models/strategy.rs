//! DCA strategy data models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dca::error::{DcaError, DcaResult};

/// Investor risk tolerance, each bound to an annualized-volatility threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub const LOW_THRESHOLD: f64 = 0.3;
    pub const MEDIUM_THRESHOLD: f64 = 0.5;
    pub const HIGH_THRESHOLD: f64 = 0.7;

    /// Annualized volatility threshold for this tolerance
    pub fn volatility_threshold(&self) -> f64 {
        match self {
            RiskTolerance::Low => Self::LOW_THRESHOLD,
            RiskTolerance::Medium => Self::MEDIUM_THRESHOLD,
            RiskTolerance::High => Self::HIGH_THRESHOLD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTolerance {
    type Err = DcaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskTolerance::Low),
            "medium" => Ok(RiskTolerance::Medium),
            "high" => Ok(RiskTolerance::High),
            other => Err(DcaError::InvalidParameter(format!(
                "unrecognized risk tolerance '{}', expected one of low, medium, high",
                other
            ))),
        }
    }
}

/// Purchase cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseFrequency {
    Monthly,
    Biweekly,
    Weekly,
}

impl PurchaseFrequency {
    /// Number of purchases per year
    pub fn annual_multiplier(&self) -> u32 {
        match self {
            PurchaseFrequency::Monthly => 12,
            PurchaseFrequency::Biweekly => 26,
            PurchaseFrequency::Weekly => 52,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PurchaseFrequency::Monthly => "monthly",
            PurchaseFrequency::Biweekly => "biweekly",
            PurchaseFrequency::Weekly => "weekly",
        }
    }
}

impl fmt::Display for PurchaseFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Investor parameters for one optimization call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub investment_amount: f64,
    pub duration_months: u32,
    pub risk_tolerance: RiskTolerance,
}

impl StrategyRequest {
    pub fn new(
        investment_amount: f64,
        duration_months: u32,
        risk_tolerance: RiskTolerance,
    ) -> DcaResult<Self> {
        let request = Self {
            investment_amount,
            duration_months,
            risk_tolerance,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> DcaResult<()> {
        if !self.investment_amount.is_finite() || self.investment_amount <= 0.0 {
            return Err(DcaError::InvalidParameter(format!(
                "investment_amount must be positive, got {}",
                self.investment_amount
            )));
        }
        if self.duration_months < 1 {
            return Err(DcaError::InvalidParameter(
                "duration_months must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Frequency and sizing derived from volatility before simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchasePlan {
    pub frequency: PurchaseFrequency,
    /// Fractional; truncated only when simulating
    pub total_purchases: f64,
    pub amount_per_purchase: f64,
}

/// Final recommendation returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub frequency: PurchaseFrequency,
    pub amount_per_purchase: f64,
    pub expected_return_pct: f64,
    pub risk_score: f64,
    pub explanation: String,
}
