//! Negative and positive point tallies

use serde::Serialize;

use super::ladders::{fvln_points, ladder, Category};
use super::parse::normalize;
use super::record::NutritionRecord;
use super::units::NutrientDimension;

/// Penalty points per nutrient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeBreakdown {
    pub energy: u32,
    pub sugars: u32,
    pub saturated_fat: u32,
    pub sodium: u32,
    pub total: u32,
}

/// Bonus points per component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositiveBreakdown {
    pub fvln: u32,
    pub fiber: u32,
    pub protein: u32,
    pub total: u32,
}

impl PositiveBreakdown {
    pub fn new(fvln: u32, fiber: u32, protein: u32) -> Self {
        Self {
            fvln,
            fiber,
            protein,
            total: fvln + fiber + protein,
        }
    }
}

/// Normalize the resolved field for `dimension` and count ladder rungs
fn ladder_points(record: &NutritionRecord, dimension: NutrientDimension, category: Category) -> u32 {
    let value = normalize(record.resolve(dimension), dimension);
    ladder(dimension, category)
        .map(|l| l.points(value))
        .unwrap_or(0)
}

/// Score the four penalized nutrients against the category's ladders
pub fn score_negative(record: &NutritionRecord, category: Category) -> NegativeBreakdown {
    let energy = ladder_points(record, NutrientDimension::Energy, category);
    let sugars = ladder_points(record, NutrientDimension::Sugars, category);
    let saturated_fat = ladder_points(record, NutrientDimension::SaturatedFat, category);
    let sodium = ladder_points(record, NutrientDimension::Sodium, category);

    NegativeBreakdown {
        energy,
        sugars,
        saturated_fat,
        sodium,
        total: energy + sugars + saturated_fat + sodium,
    }
}

/// Score produce share, fiber and protein
///
/// Positive ladders do not depend on the category.
pub fn score_positive(record: &NutritionRecord) -> PositiveBreakdown {
    let dim = NutrientDimension::FruitsVegetablesNutsPercentage;
    let fvln = fvln_points(normalize(record.resolve(dim), dim));
    let fiber = ladder_points(record, NutrientDimension::Fiber, Category::Food);
    let protein = ladder_points(record, NutrientDimension::Protein, Category::Food);

    PositiveBreakdown::new(fvln, fiber, protein)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> NutritionRecord {
        NutritionRecord::from_value(value)
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let r = NutritionRecord::new();
        assert_eq!(score_negative(&r, Category::Food), NegativeBreakdown::default());
        assert_eq!(score_negative(&r, Category::Beverage), NegativeBreakdown::default());
        assert_eq!(score_positive(&r), PositiveBreakdown::default());
    }

    #[test]
    fn test_negative_food() {
        let r = record(json!({
            "energy": "200",
            "sugars": "10g",
            "saturatedFat": "2",
            "sodium": "300"
        }));
        let neg = score_negative(&r, Category::Food);
        assert_eq!(neg.energy, 2);
        assert_eq!(neg.sugars, 2);
        assert_eq!(neg.saturated_fat, 1);
        assert_eq!(neg.sodium, 3);
        assert_eq!(neg.total, 8);
    }

    #[test]
    fn test_negative_beverage() {
        let r = record(json!({
            "energy": "200",
            "sugars": "10g",
            "saturatedFat": "2",
            "sodium": "300"
        }));
        let neg = score_negative(&r, Category::Beverage);
        assert_eq!(neg.energy, 9);
        assert_eq!(neg.sugars, 7);
        assert_eq!(neg.saturated_fat, 11);
        assert_eq!(neg.sodium, 7);
        assert_eq!(neg.total, 34);
    }

    #[test]
    fn test_negative_uses_units_and_aliases() {
        let r = record(json!({
            "energy": "1000kJ",
            "totalSugars": "5000mg",
            "sugars": "50g",
            "customFields": {"saturatedFat": "3.5g"},
            "sodium": "0.5g"
        }));
        let neg = score_negative(&r, Category::Food);
        // 1000 kJ is about 239 kcal
        assert_eq!(neg.energy, 2);
        assert_eq!(neg.sugars, 1);
        assert_eq!(neg.saturated_fat, 3);
        assert_eq!(neg.sodium, 5);
    }

    #[test]
    fn test_negative_saturates_at_ladder_top() {
        let r = record(json!({
            "energy": 9000,
            "sugars": 900,
            "saturatedFat": 900,
            "sodium": 90000
        }));
        assert_eq!(score_negative(&r, Category::Food).total, 40);
        assert_eq!(score_negative(&r, Category::Beverage).total, 40);
    }

    #[test]
    fn test_positive() {
        let r = record(json!({
            "fiber": "3g",
            "protein": "5g",
            "fruitsVegetablesNuts": "70%"
        }));
        assert_eq!(score_positive(&r), PositiveBreakdown::new(2, 4, 3));
        assert_eq!(score_positive(&r).total, 9);
    }

    #[test]
    fn test_positive_dietary_fiber_alias() {
        let r = record(json!({"dietaryFiber": "4g", "fiber": "1g"}));
        assert_eq!(score_positive(&r).fiber, 5);
    }

    #[test]
    fn test_positive_fvln_without_percent_is_zero() {
        let r = record(json!({"fruitsVegetablesNuts": "95"}));
        assert_eq!(score_positive(&r).fvln, 0);
    }

    #[test]
    fn test_positive_maximum() {
        let r = record(json!({
            "fiber": "10g",
            "protein": "20g",
            "fruitsVegetablesNuts": "100%"
        }));
        assert_eq!(score_positive(&r).total, 15);
    }
}
