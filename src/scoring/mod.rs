//! Health score engine
//!
//! Turns raw nutrition label data into a 0-100 health score. The engine is
//! a pure function of the record and the category: values are normalized
//! per nutrient, scored against threshold ladders, and the resulting points
//! are combined and rescaled.

pub mod aggregate;
pub mod ladders;
pub mod parse;
pub mod points;
pub mod record;
pub mod units;

pub use aggregate::{aggregate, raw_score, rescale, CalculationDetails, HealthScore};
pub use ladders::{fvln_points, ladder, Category, ThresholdLadder};
pub use parse::{normalize, parse_quantity, ParsedQuantity};
pub use points::{score_negative, score_positive, NegativeBreakdown, PositiveBreakdown};
pub use record::{aliases, FieldPath, NutritionRecord};
pub use units::{to_canonical, NutrientDimension};

/// Compute the health score for a nutrition record
pub fn compute_health_score(record: &NutritionRecord, category: Category) -> HealthScore {
    let negative = score_negative(record, category);
    let positive = score_positive(record);
    let score = aggregate(negative.total, &positive);

    tracing::debug!(
        category = category.as_str(),
        negative_points = negative.total,
        positive_points = positive.total,
        fsa_score = score.calculation_details.fsa_score,
        health_score = score.health_score,
        "Computed health score"
    );

    score
}
