//! Nutrient dimensions and unit conversion
//!
//! Every dimension has exactly one canonical unit. Label values arrive in
//! whatever unit the manufacturer printed and are converted here.

use serde::{Deserialize, Serialize};

/// A nutrient quantity the scorer knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NutrientDimension {
    /// Energy, canonical kcal
    Energy,
    /// Sugars, canonical grams
    Sugars,
    /// Saturated fat, canonical grams
    SaturatedFat,
    /// Sodium, canonical milligrams
    Sodium,
    /// Dietary fiber, canonical grams
    Fiber,
    /// Protein, canonical grams
    Protein,
    /// Fruits, vegetables, nuts and legumes share, canonical percent
    FruitsVegetablesNutsPercentage,
}

impl NutrientDimension {
    /// All dimensions in scoring order
    pub const ALL: [NutrientDimension; 7] = [
        NutrientDimension::Energy,
        NutrientDimension::Sugars,
        NutrientDimension::SaturatedFat,
        NutrientDimension::Sodium,
        NutrientDimension::Fiber,
        NutrientDimension::Protein,
        NutrientDimension::FruitsVegetablesNutsPercentage,
    ];

    /// Get the canonical unit string for this dimension
    pub fn canonical_unit(&self) -> &'static str {
        match self {
            NutrientDimension::Energy => "kcal",
            NutrientDimension::Sodium => "mg",
            NutrientDimension::FruitsVegetablesNutsPercentage => "%",
            NutrientDimension::Sugars
            | NutrientDimension::SaturatedFat
            | NutrientDimension::Fiber
            | NutrientDimension::Protein => "g",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientDimension::Energy => "energy",
            NutrientDimension::Sugars => "sugars",
            NutrientDimension::SaturatedFat => "saturatedFat",
            NutrientDimension::Sodium => "sodium",
            NutrientDimension::Fiber => "fiber",
            NutrientDimension::Protein => "protein",
            NutrientDimension::FruitsVegetablesNutsPercentage => "fruitsVegetablesNuts",
        }
    }
}

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;
/// Milligrams per gram
pub const MG_PER_G: f64 = 1000.0;
/// Micrograms per gram
pub const MCG_PER_G: f64 = 1_000_000.0;

// ============================================================================
// Conversion
// ============================================================================

fn is_microgram(unit: &str) -> bool {
    matches!(unit, "mcg" | "µg" | "μg" | "ug")
}

/// Convert a parsed magnitude into the canonical unit for `dimension`
///
/// `unit` is the raw suffix as it appeared on the label (may be empty).
/// Unknown units are taken to already be canonical, except for the
/// percentage dimension which only trusts an explicit `%`.
pub fn to_canonical(magnitude: f64, unit: &str, dimension: NutrientDimension) -> f64 {
    let lower = unit.trim().to_lowercase();
    let unit = lower.as_str();

    match dimension {
        NutrientDimension::Energy => {
            if unit == "kj" {
                magnitude / KJ_PER_KCAL
            } else {
                magnitude
            }
        }
        NutrientDimension::Sodium => {
            if unit == "g" {
                magnitude * MG_PER_G
            } else {
                magnitude
            }
        }
        NutrientDimension::FruitsVegetablesNutsPercentage => {
            if unit == "%" {
                magnitude
            } else {
                0.0
            }
        }
        NutrientDimension::Sugars
        | NutrientDimension::SaturatedFat
        | NutrientDimension::Fiber
        | NutrientDimension::Protein => {
            if unit == "mg" {
                magnitude / MG_PER_G
            } else if is_microgram(unit) {
                magnitude / MCG_PER_G
            } else {
                magnitude
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_units() {
        assert_eq!(NutrientDimension::Energy.canonical_unit(), "kcal");
        assert_eq!(NutrientDimension::Sodium.canonical_unit(), "mg");
        assert_eq!(NutrientDimension::Protein.canonical_unit(), "g");
        assert_eq!(
            NutrientDimension::FruitsVegetablesNutsPercentage.canonical_unit(),
            "%"
        );
    }

    #[test]
    fn test_energy_kilojoules() {
        assert!((to_canonical(4.184, "kJ", NutrientDimension::Energy) - 1.0).abs() < 1e-9);
        assert!((to_canonical(418.4, "KJ", NutrientDimension::Energy) - 100.0).abs() < 1e-9);
        assert_eq!(to_canonical(250.0, "kcal", NutrientDimension::Energy), 250.0);
        assert_eq!(to_canonical(250.0, "", NutrientDimension::Energy), 250.0);
    }

    #[test]
    fn test_sodium_grams_to_milligrams() {
        assert_eq!(to_canonical(1.0, "g", NutrientDimension::Sodium), 1000.0);
        assert_eq!(to_canonical(300.0, "mg", NutrientDimension::Sodium), 300.0);
        assert_eq!(to_canonical(300.0, "", NutrientDimension::Sodium), 300.0);
    }

    #[test]
    fn test_mass_family() {
        assert_eq!(to_canonical(1000.0, "mg", NutrientDimension::Sugars), 1.0);
        assert_eq!(to_canonical(500.0, "mcg", NutrientDimension::Fiber), 0.0005);
        assert_eq!(to_canonical(2_000_000.0, "µg", NutrientDimension::Protein), 2.0);
        assert_eq!(to_canonical(3.0, "g", NutrientDimension::SaturatedFat), 3.0);
        assert_eq!(to_canonical(3.0, "oz", NutrientDimension::SaturatedFat), 3.0);
    }

    #[test]
    fn test_percentage_requires_marker() {
        let dim = NutrientDimension::FruitsVegetablesNutsPercentage;
        assert_eq!(to_canonical(80.0, "%", dim), 80.0);
        assert_eq!(to_canonical(80.0, "", dim), 0.0);
        assert_eq!(to_canonical(80.0, "g", dim), 0.0);
    }
}
