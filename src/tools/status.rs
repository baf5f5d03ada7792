//! HSM Status Tool
//!
//! Provides runtime status information about the HSM service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::Product;
use crate::scoring::Category;

/// Scoring instructions for AI assistants
pub const SCORING_INSTRUCTIONS: &str = r#"
# HSM Health Score Instructions

HSM rates packaged foods and drinks from 0 (least healthy) to 100 (healthiest)
using the label's per-100g (or per-100ml) values.

## Storing a product

Call `add_product` with a name, a category (`food` or `beverage`) and a
`nutrition` object holding the label values as printed:

```json
{
  "energy": "200kcal",
  "sugars": "10g",
  "saturatedFat": "2g",
  "sodium": "300mg",
  "fiber": "3g",
  "protein": "5g",
  "fruitsVegetablesNuts": "70%"
}
```

- Values may be numbers or strings with a unit suffix.
- Energy in `kJ` is converted to kcal. Sodium in `g` is converted to mg.
  Sugars, saturated fat, fiber and protein accept `g`, `mg` and `mcg`.
- `fruitsVegetablesNuts` is only counted when it carries a `%` sign.
- `totalSugars` is preferred over `sugars`, `dietaryFiber` over `fiber`,
  and `customFields.saturatedFat` over `saturatedFat`.
- Missing or unreadable values count as zero.

## Scoring

- `compute_health_score` scores a stored product and saves the result.
  Pass `is_beverage` only to override the stored category; the override is
  saved on the product along with the score.
- `preview_health_score` scores a nutrition object without saving anything.
- `rescore_all_products` recomputes every stored product.

Changing a product's nutrition or category clears its saved score.

## Reading the result

- `negativePoints` (0-40): energy, sugars, saturated fat, sodium.
- `positivePoints` (0-15): produce share, fiber, protein.
- `fsaScore`: negative minus positive points. Once negative points reach 11,
  protein no longer counts unless the produce share is at least 80%.
- `healthScore`: `fsaScore` mapped from [-15, 40] onto [100, 0].
"#;

/// Product counts in the store
#[derive(Debug, Clone, Serialize)]
pub struct ProductCounts {
    pub total: i64,
    pub food: i64,
    pub beverage: i64,
    pub scored: i64,
}

/// Runtime status of the HSM service
#[derive(Debug, Clone, Serialize)]
pub struct HsmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub products: Option<ProductCounts>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

fn product_counts(database: &Database) -> Option<ProductCounts> {
    let counts = database.with_conn(|conn| {
        Ok(ProductCounts {
            total: Product::count(conn, None)?,
            food: Product::count(conn, Some(Category::Food))?,
            beverage: Product::count(conn, Some(Category::Beverage))?,
            scored: Product::count_scored(conn)?,
        })
    });

    match counts {
        Ok(counts) => Some(counts),
        Err(e) => {
            tracing::warn!("Could not count products: {}", e);
            None
        }
    }
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, database: &Database) -> HsmStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        HsmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            products: product_counts(database),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
