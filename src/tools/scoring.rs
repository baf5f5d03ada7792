//! Health Score MCP Tools
//!
//! Fetches stored label data, runs the engine and persists the result.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::Product;
use crate::scoring::{compute_health_score, CalculationDetails, Category, HealthScore, NutritionRecord};

/// Failures surfaced by the scoring tools
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Product not found with id: {0}")]
    ProductNotFound(i64),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl ScoreError {
    /// HTTP-style status for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            ScoreError::MissingInput(_) => 400,
            ScoreError::ProductNotFound(_) => 404,
            ScoreError::Database(_) => 500,
        }
    }
}

/// Response for compute_health_score
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreProductResponse {
    pub success: bool,
    pub product_id: i64,
    pub category: Category,
    pub health_score: u8,
    pub calculation_details: CalculationDetails,
    pub health_score_updated_at: String,
}

/// Response for rescore_all_products
#[derive(Debug, Serialize)]
pub struct RescoreSummary {
    pub products_scored: usize,
    pub products_skipped: usize,
    pub scored_at: String,
}

fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Score a stored product and persist the result
///
/// `category_override` takes precedence over the stored category when given
/// and is saved as the product's category together with the score.
pub fn score_product(
    db: &Database,
    product_id: Option<i64>,
    category_override: Option<&Value>,
) -> Result<ScoreProductResponse, ScoreError> {
    let id = product_id.ok_or(ScoreError::MissingInput("product_id"))?;
    let conn = db.get_conn()?;

    let product = Product::get_by_id(&conn, id)?.ok_or(ScoreError::ProductNotFound(id))?;
    let category = match category_override {
        Some(flag) if !flag.is_null() => Category::from_flag(Some(flag)),
        _ => product.category,
    };

    let score = compute_health_score(&product.nutrition, category);
    let scored_at = now_timestamp();

    // Deleted between read and write
    if !Product::save_score(&conn, id, category, &score, &scored_at)? {
        return Err(ScoreError::ProductNotFound(id));
    }

    tracing::info!(
        "Scored product {} as {}: {}",
        id,
        category.as_str(),
        score.health_score
    );

    Ok(ScoreProductResponse {
        success: true,
        product_id: id,
        category,
        health_score: score.health_score,
        calculation_details: score.calculation_details,
        health_score_updated_at: scored_at,
    })
}

/// Score ad hoc label data without touching the store
pub fn preview_score(nutrition: Option<&Value>, category: Option<&Value>) -> Result<HealthScore, ScoreError> {
    let record = match nutrition {
        Some(Value::Object(map)) => NutritionRecord::from(map.clone()),
        _ => return Err(ScoreError::MissingInput("nutrition")),
    };
    Ok(compute_health_score(&record, Category::from_flag(category)))
}

/// Recompute and persist the score of every stored product
pub fn rescore_all(db: &Database) -> Result<RescoreSummary, ScoreError> {
    let conn = db.get_conn()?;
    let scored_at = now_timestamp();
    let mut products_scored = 0;
    let mut products_skipped = 0;

    for id in Product::all_ids(&conn)? {
        let Some(product) = Product::get_by_id(&conn, id)? else {
            products_skipped += 1;
            continue;
        };
        let score = compute_health_score(&product.nutrition, product.category);
        if Product::save_score(&conn, id, product.category, &score, &scored_at)? {
            products_scored += 1;
        } else {
            products_skipped += 1;
        }
    }

    tracing::info!(
        "Rescored {} products ({} skipped)",
        products_scored,
        products_skipped
    );

    Ok(RescoreSummary {
        products_scored,
        products_skipped,
        scored_at,
    })
}
