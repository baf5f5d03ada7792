//! Nutrition records and field aliasing
//!
//! Label data is stored exactly as it was submitted. Several historical
//! field names can carry the same nutrient, so every dimension declares an
//! ordered alias list and [`NutritionRecord::resolve`] walks it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::units::NutrientDimension;

/// Location of a raw value inside a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// A top-level key
    Top(&'static str),
    /// A key inside a nested object, e.g. `customFields.saturatedFat`
    Nested(&'static str, &'static str),
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldPath::Top(key) => write!(f, "{}", key),
            FieldPath::Nested(parent, key) => write!(f, "{}.{}", parent, key),
        }
    }
}

const ENERGY_ALIASES: &[FieldPath] = &[FieldPath::Top("energy")];
const SUGARS_ALIASES: &[FieldPath] = &[FieldPath::Top("totalSugars"), FieldPath::Top("sugars")];
const SATURATED_FAT_ALIASES: &[FieldPath] = &[
    FieldPath::Nested("customFields", "saturatedFat"),
    FieldPath::Top("saturatedFat"),
];
const SODIUM_ALIASES: &[FieldPath] = &[FieldPath::Top("sodium")];
const FIBER_ALIASES: &[FieldPath] = &[FieldPath::Top("dietaryFiber"), FieldPath::Top("fiber")];
const PROTEIN_ALIASES: &[FieldPath] = &[FieldPath::Top("protein")];
const FVLN_ALIASES: &[FieldPath] = &[FieldPath::Top("fruitsVegetablesNuts")];

/// Field names that may hold `dimension`, highest priority first
pub fn aliases(dimension: NutrientDimension) -> &'static [FieldPath] {
    match dimension {
        NutrientDimension::Energy => ENERGY_ALIASES,
        NutrientDimension::Sugars => SUGARS_ALIASES,
        NutrientDimension::SaturatedFat => SATURATED_FAT_ALIASES,
        NutrientDimension::Sodium => SODIUM_ALIASES,
        NutrientDimension::Fiber => FIBER_ALIASES,
        NutrientDimension::Protein => PROTEIN_ALIASES,
        NutrientDimension::FruitsVegetablesNutsPercentage => FVLN_ALIASES,
    }
}

/// Whether a raw value carries anything worth reading
///
/// `null`, `false`, blank strings and the number zero are unset and let the
/// next alias take over.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Raw nutrition label data keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutritionRecord {
    fields: Map<String, Value>,
}

impl NutritionRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from any JSON value
    ///
    /// Only objects carry fields; anything else yields an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the raw value at `path`, if present
    pub fn get(&self, path: FieldPath) -> Option<&Value> {
        match path {
            FieldPath::Top(key) => self.fields.get(key),
            FieldPath::Nested(parent, key) => self.fields.get(parent)?.as_object()?.get(key),
        }
    }

    /// Resolve the raw value for `dimension` through its alias list
    pub fn resolve(&self, dimension: NutrientDimension) -> Option<&Value> {
        aliases(dimension)
            .iter()
            .filter_map(|path| self.get(*path))
            .find(|value| is_set(value))
    }

    /// The alias that supplied `dimension`, if any
    pub fn resolved_path(&self, dimension: NutrientDimension) -> Option<FieldPath> {
        aliases(dimension)
            .iter()
            .copied()
            .find(|path| self.get(*path).map(is_set).unwrap_or(false))
    }
}

impl From<Map<String, Value>> for NutritionRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> NutritionRecord {
        NutritionRecord::from_value(value)
    }

    #[test]
    fn test_every_dimension_has_aliases() {
        for dim in NutrientDimension::ALL {
            assert!(!aliases(dim).is_empty(), "{:?} has no aliases", dim);
        }
    }

    #[test]
    fn test_total_sugars_preferred() {
        let r = record(json!({"totalSugars": "12g", "sugars": "3g"}));
        assert_eq!(r.resolve(NutrientDimension::Sugars), Some(&json!("12g")));
        assert_eq!(
            r.resolved_path(NutrientDimension::Sugars),
            Some(FieldPath::Top("totalSugars"))
        );
    }

    #[test]
    fn test_falls_back_to_sugars() {
        let r = record(json!({"sugars": "3g"}));
        assert_eq!(r.resolve(NutrientDimension::Sugars), Some(&json!("3g")));
    }

    #[test]
    fn test_unset_values_fall_through() {
        let r = record(json!({"totalSugars": "", "sugars": "3g"}));
        assert_eq!(r.resolve(NutrientDimension::Sugars), Some(&json!("3g")));

        let r = record(json!({"dietaryFiber": null, "fiber": 4}));
        assert_eq!(r.resolve(NutrientDimension::Fiber), Some(&json!(4)));

        let r = record(json!({"dietaryFiber": 0, "fiber": "2g"}));
        assert_eq!(r.resolve(NutrientDimension::Fiber), Some(&json!("2g")));
    }

    #[test]
    fn test_string_zero_is_set() {
        let r = record(json!({"totalSugars": "0g", "sugars": "3g"}));
        assert_eq!(r.resolve(NutrientDimension::Sugars), Some(&json!("0g")));
    }

    #[test]
    fn test_saturated_fat_custom_fields_first() {
        let r = record(json!({
            "customFields": {"saturatedFat": "4g"},
            "saturatedFat": "1g"
        }));
        assert_eq!(r.resolve(NutrientDimension::SaturatedFat), Some(&json!("4g")));
        assert_eq!(
            r.resolved_path(NutrientDimension::SaturatedFat).map(|p| p.to_string()),
            Some("customFields.saturatedFat".to_string())
        );

        let r = record(json!({"customFields": {}, "saturatedFat": "1g"}));
        assert_eq!(r.resolve(NutrientDimension::SaturatedFat), Some(&json!("1g")));

        let r = record(json!({"customFields": "oops", "saturatedFat": "1g"}));
        assert_eq!(r.resolve(NutrientDimension::SaturatedFat), Some(&json!("1g")));
    }

    #[test]
    fn test_absent_dimension() {
        let r = NutritionRecord::new();
        assert!(r.is_empty());
        assert_eq!(r.resolve(NutrientDimension::Energy), None);
        assert_eq!(r.resolved_path(NutrientDimension::Energy), None);
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(record(json!([1, 2, 3])).is_empty());
        assert!(record(json!("energy")).is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let r: NutritionRecord = serde_json::from_str(r#"{"energy": "120kcal"}"#).unwrap();
        assert_eq!(r.resolve(NutrientDimension::Energy), Some(&json!("120kcal")));
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"energy":"120kcal"}"#);
    }
}
