//! Rule-based outburst risk classification
//!
//! The score is the sum of independent, non-exclusive rules. Every rule is
//! evaluated for every record; none short-circuits another. Weights and
//! thresholds are fixed: they are the model.

use tracing::debug;

use crate::models::{FeatureRecord, RiskLevel};

/// 48-hour precipitation above which heavy rain is assumed (mm)
pub const PRECIP_48H_THRESHOLD_MM: f64 = 100.0;
/// 7-day precipitation above which heavy rain is assumed (mm)
pub const PRECIP_7D_THRESHOLD_MM: f64 = 200.0;
/// Lake growth at or above which the lake counts as expanding (%)
pub const AREA_CHANGE_THRESHOLD_PCT: f64 = 30.0;
/// Slope above which terrain counts as steep (m/m)
pub const SLOPE_THRESHOLD: f64 = 0.15;
/// Mean elevation below which downstream exposure is assumed (m)
pub const ELEVATION_THRESHOLD_M: f64 = 3000.0;
/// Warm anomaly above which melt is assumed (°C)
pub const TEMP_ANOMALY_THRESHOLD_C: f64 = 2.0;

/// A single weighted predicate over a feature record
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub name: &'static str,
    pub points: u32,
    pub applies: fn(&FeatureRecord) -> bool,
}

fn heavy_precipitation(f: &FeatureRecord) -> bool {
    f.precip_48h > PRECIP_48H_THRESHOLD_MM || f.precip_7d > PRECIP_7D_THRESHOLD_MM
}

fn expanding_lake(f: &FeatureRecord) -> bool {
    f.area_change_pct >= AREA_CHANGE_THRESHOLD_PCT
}

fn steep_terrain(f: &FeatureRecord) -> bool {
    f.slope > SLOPE_THRESHOLD
}

fn low_elevation(f: &FeatureRecord) -> bool {
    f.elevation_mean < ELEVATION_THRESHOLD_M
}

fn warm_anomaly(f: &FeatureRecord) -> bool {
    f.temp_anomaly > TEMP_ANOMALY_THRESHOLD_C
}

/// Ordered rule table
pub const RISK_RULES: [RiskRule; 5] = [
    RiskRule {
        name: "heavy_precipitation",
        points: 2,
        applies: heavy_precipitation,
    },
    RiskRule {
        name: "expanding_lake",
        points: 2,
        applies: expanding_lake,
    },
    RiskRule {
        name: "steep_terrain",
        points: 1,
        applies: steep_terrain,
    },
    RiskRule {
        name: "low_elevation",
        points: 1,
        applies: low_elevation,
    },
    RiskRule {
        name: "warm_anomaly",
        points: 1,
        applies: warm_anomaly,
    },
];

pub struct RiskClassifier;

impl RiskClassifier {
    /// Score a record against [`RISK_RULES`] and map the score to a level
    #[must_use]
    pub fn classify(features: &FeatureRecord) -> (RiskLevel, u32) {
        let score = Self::score(features);
        (RiskLevel::from_score(score), score)
    }

    #[must_use]
    pub fn score(features: &FeatureRecord) -> u32 {
        RISK_RULES
            .iter()
            .filter(|rule| (rule.applies)(features))
            .inspect(|rule| debug!(rule = rule.name, points = rule.points, "rule triggered"))
            .map(|rule| rule.points)
            .sum()
    }

    /// Names of the rules that fire for this record, in table order
    #[must_use]
    pub fn triggered_rules(features: &FeatureRecord) -> Vec<&'static str> {
        RISK_RULES
            .iter()
            .filter(|rule| (rule.applies)(features))
            .map(|rule| rule.name)
            .collect()
    }
}
