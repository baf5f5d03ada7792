//! HSM MCP Server Implementation
//!
//! Implements the MCP server with all HSM tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{ProductCreate, ProductUpdate};
use crate::scoring::{Category, NutritionRecord};
use crate::tools::products;
use crate::tools::scoring::{self, ScoreError};
use crate::tools::status::StatusTracker;

/// HSM MCP Service
#[derive(Clone)]
pub struct HsmService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<HsmService>,
}

impl HsmService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

/// Map scoring failures onto MCP errors by status class
fn score_error(e: ScoreError) -> McpError {
    tracing::warn!("Scoring failed ({}): {}", e.status_code(), e);
    match e.status_code() {
        400 => McpError::invalid_params(e.to_string(), None),
        404 => McpError::resource_not_found(e.to_string(), None),
        _ => McpError::internal_error(e.to_string(), None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Product Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductParams {
    /// Product name
    pub name: String,
    /// Brand (optional)
    pub brand: Option<String>,
    /// "food" or "beverage" (default food)
    pub category: Option<String>,
    /// Label values, e.g. {"energy": "200kcal", "sugars": "10g", "fruitsVegetablesNuts": "40%"}
    pub nutrition: Option<Value>,
    /// Optional notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetProductParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchProductsParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 { 20 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListProductsParams {
    /// Only list "food" or "beverage" products (optional)
    pub category: Option<String>,
    /// Sort by: name, created_at, or health_score (default name)
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Sort order: asc or desc (default asc)
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_sort_by() -> String { "name".to_string() }
fn default_sort_order() -> String { "asc".to_string() }
fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProductParams {
    /// Product ID to update
    pub id: i64,
    pub name: Option<String>,
    pub brand: Option<String>,
    /// "food" or "beverage"
    pub category: Option<String>,
    /// Replacement label values (replaces the whole object)
    pub nutrition: Option<Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteProductParams {
    /// Product ID to delete
    pub id: i64,
}

// ============================================================================
// Scoring Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComputeHealthScoreParams {
    /// Stored product ID
    pub product_id: Option<i64>,
    /// Score under this category and save it on the product: true/false, or "beverage"/"food"
    pub is_beverage: Option<Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewHealthScoreParams {
    /// Label values to score
    pub nutrition: Option<Value>,
    /// true/false, or "beverage"/"food" (default food)
    pub is_beverage: Option<Value>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl HsmService {
    // --- Status ---

    #[tool(description = "Get the current status of the HSM service including build info, product counts, and process information")]
    async fn hsm_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        json_result(&status)
    }

    #[tool(description = "Get instructions for entering label data and reading health scores. Call this before adding products.")]
    fn scoring_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::SCORING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(SCORING_INSTRUCTIONS)]))
    }

    // --- Products ---

    #[tool(description = "Add a food or beverage product with its nutrition label values")]
    fn add_product(&self, Parameters(p): Parameters<AddProductParams>) -> Result<CallToolResult, McpError> {
        let nutrition = products::nutrition_from_param(p.nutrition)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let data = ProductCreate {
            name: p.name,
            brand: p.brand,
            category: p.category.as_deref().map(Category::from_str).unwrap_or_default(),
            nutrition: nutrition.unwrap_or_else(NutritionRecord::new),
            notes: p.notes,
        };
        let result = products::add_product(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get full details for a product including label values and its last health score")]
    fn get_product(&self, Parameters(p): Parameters<GetProductParams>) -> Result<CallToolResult, McpError> {
        let result = products::get_product(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => json_result(&detail),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Product not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Search products by name or brand")]
    fn search_products(&self, Parameters(p): Parameters<SearchProductsParams>) -> Result<CallToolResult, McpError> {
        let result = products::search_products(&self.database, &p.query, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List products with optional category filter, sorting, and pagination")]
    fn list_products(&self, Parameters(p): Parameters<ListProductsParams>) -> Result<CallToolResult, McpError> {
        let result = products::list_products(&self.database, p.category.as_deref(), &p.sort_by, &p.sort_order, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a product. Changing nutrition or category clears its saved health score.")]
    fn update_product(&self, Parameters(p): Parameters<UpdateProductParams>) -> Result<CallToolResult, McpError> {
        let nutrition = products::nutrition_from_param(p.nutrition)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let data = ProductUpdate {
            name: p.name,
            brand: p.brand,
            category: p.category.as_deref().map(Category::from_str),
            nutrition,
            notes: p.notes,
        };
        let result = products::update_product(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a product")]
    fn delete_product(&self, Parameters(p): Parameters<DeleteProductParams>) -> Result<CallToolResult, McpError> {
        let result = products::delete_product(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Scoring ---

    #[tool(description = "Compute the 0-100 health score of a stored product and save it with a timestamp. An is_beverage override is saved as the product's category.")]
    fn compute_health_score(&self, Parameters(p): Parameters<ComputeHealthScoreParams>) -> Result<CallToolResult, McpError> {
        let result = scoring::score_product(&self.database, p.product_id, p.is_beverage.as_ref()).map_err(score_error)?;
        json_result(&result)
    }

    #[tool(description = "Compute a health score for label values without saving anything")]
    fn preview_health_score(&self, Parameters(p): Parameters<PreviewHealthScoreParams>) -> Result<CallToolResult, McpError> {
        let result = scoring::preview_score(p.nutrition.as_ref(), p.is_beverage.as_ref()).map_err(score_error)?;
        json_result(&result)
    }

    #[tool(description = "Recompute and save the health score of every stored product")]
    fn rescore_all_products(&self) -> Result<CallToolResult, McpError> {
        let result = scoring::rescore_all(&self.database).map_err(score_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for HsmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "hsm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Health Score Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Health Score Manager (HSM) - 0-100 health scores for packaged foods and beverages. \
                 Call scoring_instructions first. \
                 Products: add/get/search/list/update/delete_product. \
                 Scoring: compute_health_score (stored product, saves result), \
                 preview_health_score (ad hoc label values), rescore_all_products."
                    .into(),
            ),
        }
    }
}
