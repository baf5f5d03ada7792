//! Raw score and 0-100 rescaling

use serde::{Deserialize, Serialize};

use super::points::PositiveBreakdown;

/// Lowest raw score the rescaling expects (all positives, no negatives)
pub const RAW_SCORE_MIN: f64 = -15.0;
/// Highest raw score the rescaling expects (all negatives, no positives)
pub const RAW_SCORE_MAX: f64 = 40.0;
/// Negative points at which protein stops offsetting the penalty
pub const NEGATIVE_POINTS_CAP: u32 = 11;
/// FVLN points that lift the protein cap
pub const FVLN_MAX_POINTS: u32 = 5;

/// Points and raw score behind a health score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDetails {
    pub negative_points: u32,
    pub positive_points: u32,
    pub fsa_score: f64,
}

/// Engine output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// 0 (least healthy) to 100 (healthiest)
    pub health_score: u8,
    pub calculation_details: CalculationDetails,
}

/// Combine the tallies into the raw (FSA-style) score; lower is healthier
pub fn raw_score(negative_points: u32, positive: &PositiveBreakdown) -> f64 {
    let offset = if negative_points < NEGATIVE_POINTS_CAP || positive.fvln >= FVLN_MAX_POINTS {
        positive.total
    } else {
        positive.fvln + positive.fiber
    };
    negative_points as f64 - offset as f64
}

/// Map a raw score onto 0-100 with higher meaning healthier
pub fn rescale(raw: f64) -> u8 {
    let scaled = (raw - RAW_SCORE_MIN) / (RAW_SCORE_MAX - RAW_SCORE_MIN) * 100.0;
    let inverted = 100.0 - scaled.clamp(0.0, 100.0);
    inverted.round() as u8
}

pub fn aggregate(negative_points: u32, positive: &PositiveBreakdown) -> HealthScore {
    let fsa_score = raw_score(negative_points, positive);

    HealthScore {
        health_score: rescale(fsa_score),
        calculation_details: CalculationDetails {
            negative_points,
            positive_points: positive.total,
            fsa_score,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_cap_counts_everything() {
        let pos = PositiveBreakdown::new(2, 4, 3);
        assert_eq!(raw_score(8, &pos), -1.0);
        assert_eq!(raw_score(10, &pos), 1.0);
    }

    #[test]
    fn test_cap_drops_protein() {
        let pos = PositiveBreakdown::new(2, 4, 3);
        assert_eq!(raw_score(11, &pos), 5.0);
        assert_eq!(raw_score(34, &pos), 28.0);
    }

    #[test]
    fn test_cap_lifted_by_max_fvln() {
        let pos = PositiveBreakdown::new(5, 4, 3);
        assert_eq!(raw_score(11, &pos), -1.0);
        assert_eq!(raw_score(20, &pos), 8.0);
    }

    #[test]
    fn test_rescale_endpoints() {
        assert_eq!(rescale(-15.0), 100);
        assert_eq!(rescale(40.0), 0);
        assert_eq!(rescale(12.5), 50);
    }

    #[test]
    fn test_rescale_clamps() {
        assert_eq!(rescale(-100.0), 100);
        assert_eq!(rescale(500.0), 0);
    }

    #[test]
    fn test_rescale_rounding() {
        // (-1 + 15) / 55 * 100 = 25.45..., inverted 74.54...
        assert_eq!(rescale(-1.0), 75);
        // (28 + 15) / 55 * 100 = 78.18..., inverted 21.81...
        assert_eq!(rescale(28.0), 22);
        assert_eq!(rescale(0.0), 73);
    }

    #[test]
    fn test_aggregate_details() {
        let pos = PositiveBreakdown::new(1, 2, 3);
        let score = aggregate(12, &pos);
        assert_eq!(score.calculation_details.negative_points, 12);
        assert_eq!(score.calculation_details.positive_points, 6);
        assert_eq!(score.calculation_details.fsa_score, 9.0);
        assert_eq!(score.health_score, rescale(9.0));
    }

    #[test]
    fn test_serialized_field_names() {
        let score = aggregate(0, &PositiveBreakdown::default());
        let json = serde_json::to_value(score).unwrap();
        assert_eq!(json["healthScore"], 73);
        assert_eq!(json["calculationDetails"]["negativePoints"], 0);
        assert_eq!(json["calculationDetails"]["positivePoints"], 0);
        assert_eq!(json["calculationDetails"]["fsaScore"], 0.0);
    }
}
