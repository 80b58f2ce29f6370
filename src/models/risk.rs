//! Risk level and prediction result

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::FeatureRecord;

/// Qualitative outburst risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Score at or above which a location is `High`
    pub const HIGH_SCORE: u32 = 4;
    /// Score at or above which a location is `Medium`
    pub const MEDIUM_SCORE: u32 = 2;

    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= Self::HIGH_SCORE {
            RiskLevel::High
        } else if score >= Self::MEDIUM_SCORE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        write!(f, "{name}")
    }
}

/// Terminal output of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub risk_level: RiskLevel,
    pub score: u32,
    pub features: FeatureRecord,
}
