//! Threshold ladders
//!
//! Points tables for each nutrient dimension. The negative dimensions have a
//! food ladder and a beverage ladder; the positive dimensions share one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::units::NutrientDimension;

/// Product category, selects the negative-point ladders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Food,
    Beverage,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Beverage => "beverage",
        }
    }

    /// Parse from string; anything unrecognized is food
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "beverage" | "drink" | "true" | "yes" | "1" => Category::Beverage,
            _ => Category::Food,
        }
    }

    pub fn from_is_beverage(is_beverage: bool) -> Self {
        if is_beverage {
            Category::Beverage
        } else {
            Category::Food
        }
    }

    /// Interpret a loosely typed flag (`true`, `"beverage"`, `1`, ...)
    pub fn from_flag(flag: Option<&Value>) -> Self {
        match flag {
            Some(Value::Bool(b)) => Self::from_is_beverage(*b),
            Some(Value::Number(n)) => Self::from_is_beverage(n.as_f64().unwrap_or(0.0) != 0.0),
            Some(Value::String(s)) => Self::from_str(s),
            _ => Category::Food,
        }
    }

    /// Convert to database flag
    pub fn is_beverage(&self) -> bool {
        matches!(self, Category::Beverage)
    }
}

/// Ascending breakpoints; a value scores one point per rung it strictly exceeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdLadder(&'static [f64]);

impl ThresholdLadder {
    pub const fn new(rungs: &'static [f64]) -> Self {
        Self(rungs)
    }

    pub fn rungs(&self) -> &'static [f64] {
        self.0
    }

    /// Highest score this ladder can award
    pub fn max_points(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn points(&self, value: f64) -> u32 {
        self.0.iter().filter(|&&rung| value > rung).count() as u32
    }
}

// ============================================================================
// Food ladders
// ============================================================================

const FOOD_ENERGY: ThresholdLadder = ThresholdLadder::new(&[
    80.0, 160.0, 240.0, 320.0, 400.0, 480.0, 560.0, 640.0, 720.0, 800.0,
]);
const FOOD_SUGARS: ThresholdLadder = ThresholdLadder::new(&[
    4.5, 9.0, 13.5, 18.0, 22.5, 27.0, 31.5, 36.0, 40.5, 45.0,
]);
const FOOD_SATURATED_FAT: ThresholdLadder = ThresholdLadder::new(&[
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0,
]);
const FOOD_SODIUM: ThresholdLadder = ThresholdLadder::new(&[
    90.0, 180.0, 270.0, 360.0, 450.0, 540.0, 630.0, 720.0, 810.0, 900.0,
]);

// ============================================================================
// Beverage ladders
// ============================================================================

const BEVERAGE_ENERGY: ThresholdLadder = ThresholdLadder::new(&[
    7.2, 14.3, 21.5, 28.7, 35.9, 43.0, 50.2, 57.4, 64.5,
]);
const BEVERAGE_SUGARS: ThresholdLadder = ThresholdLadder::new(&[
    0.0, 1.5, 3.0, 4.5, 6.0, 7.5, 9.0, 10.5, 12.0, 13.5,
]);
const BEVERAGE_SATURATED_FAT: ThresholdLadder = ThresholdLadder::new(&[
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0,
]);
const BEVERAGE_SODIUM: ThresholdLadder = ThresholdLadder::new(&[
    0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0, 360.0, 405.0,
]);

// ============================================================================
// Shared positive ladders
// ============================================================================

const FIBER: ThresholdLadder = ThresholdLadder::new(&[0.7, 1.4, 2.1, 2.8, 3.5]);
const PROTEIN: ThresholdLadder = ThresholdLadder::new(&[1.6, 3.2, 4.8, 6.4, 8.0]);

/// Fruit/vegetable/nut share bands as `(minimum percent, points)`, highest first
pub const FVLN_BANDS: &[(f64, u32)] = &[(80.0, 5), (60.0, 2), (40.0, 1)];

/// Look up the ladder for a dimension and category
///
/// Returns `None` for the fruit/vegetable/nut share, which is banded
/// rather than laddered (see [`fvln_points`]).
pub fn ladder(dimension: NutrientDimension, category: Category) -> Option<ThresholdLadder> {
    let ladder = match (dimension, category) {
        (NutrientDimension::Energy, Category::Food) => FOOD_ENERGY,
        (NutrientDimension::Sugars, Category::Food) => FOOD_SUGARS,
        (NutrientDimension::SaturatedFat, Category::Food) => FOOD_SATURATED_FAT,
        (NutrientDimension::Sodium, Category::Food) => FOOD_SODIUM,
        (NutrientDimension::Energy, Category::Beverage) => BEVERAGE_ENERGY,
        (NutrientDimension::Sugars, Category::Beverage) => BEVERAGE_SUGARS,
        (NutrientDimension::SaturatedFat, Category::Beverage) => BEVERAGE_SATURATED_FAT,
        (NutrientDimension::Sodium, Category::Beverage) => BEVERAGE_SODIUM,
        (NutrientDimension::Fiber, _) => FIBER,
        (NutrientDimension::Protein, _) => PROTEIN,
        (NutrientDimension::FruitsVegetablesNutsPercentage, _) => return None,
    };
    Some(ladder)
}

/// Points for a fruit/vegetable/nut percentage; only the highest band applies
pub fn fvln_points(percentage: f64) -> u32 {
    FVLN_BANDS
        .iter()
        .find(|(minimum, _)| percentage >= *minimum)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}
