//! Product MCP Tools
//!
//! Tools for managing products in the store.

use serde::Serialize;
use serde_json::Value;

use crate::db::Database;
use crate::models::{Product, ProductCreate, ProductUpdate};
use crate::scoring::{CalculationDetails, Category, NutritionRecord};

/// Response for add_product
#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category: Category,
    pub created_at: String,
}

/// Summary of a product for list/search results
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category: Category,
    pub health_score: Option<u8>,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            brand: p.brand.clone(),
            category: p.category,
            health_score: p.health_score,
        }
    }
}

/// Full product detail response
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category: Category,
    pub nutrition: NutritionRecord,
    pub health_score: Option<u8>,
    pub calculation_details: Option<CalculationDetails>,
    pub health_score_updated_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductDetail {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            brand: p.brand,
            category: p.category,
            nutrition: p.nutrition,
            health_score: p.health_score,
            calculation_details: p.calculation_details,
            health_score_updated_at: p.health_score_updated_at,
            notes: p.notes,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Response for search_products
#[derive(Debug, Serialize)]
pub struct SearchProductsResponse {
    pub items: Vec<ProductSummary>,
    pub total: usize,
}

/// Response for list_products
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub items: Vec<ProductSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for update_product
#[derive(Debug, Serialize)]
pub struct UpdateProductResponse {
    pub success: bool,
    pub updated_at: String,
    /// True when the stored score was cleared and needs recomputing
    pub score_cleared: bool,
}

/// Response for delete_product
#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Accept only JSON objects as nutrition payloads
pub fn nutrition_from_param(value: Option<Value>) -> Result<Option<NutritionRecord>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(NutritionRecord::from(map))),
        Some(_) => Err("nutrition must be a JSON object".to_string()),
    }
}

/// Add a new product
pub fn add_product(db: &Database, data: ProductCreate) -> Result<AddProductResponse, String> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err("Product name cannot be empty".to_string());
    }
    let data = ProductCreate {
        name: name.to_string(),
        ..data
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::create(&conn, &data)
        .map_err(|e| format!("Failed to create product: {}", e))?;

    tracing::info!("Added product {} ({})", product.id, product.name);

    Ok(AddProductResponse {
        id: product.id,
        name: product.name,
        brand: product.brand,
        category: product.category,
        created_at: product.created_at,
    })
}

/// Get a product by ID
pub fn get_product(db: &Database, id: i64) -> Result<Option<ProductDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get product: {}", e))?;

    Ok(product.map(ProductDetail::from))
}

/// Search products by name or brand
pub fn search_products(db: &Database, query: &str, limit: i64) -> Result<SearchProductsResponse, String> {
    let limit = limit.clamp(1, 100);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = Product::search(&conn, query, limit)
        .map_err(|e| format!("Search failed: {}", e))?;

    let summaries: Vec<ProductSummary> = items.iter().map(ProductSummary::from).collect();
    let total = summaries.len();

    Ok(SearchProductsResponse {
        items: summaries,
        total,
    })
}

/// List products with filtering and pagination
pub fn list_products(
    db: &Database,
    category: Option<&str>,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListProductsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let category = category.map(Category::from_str);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = Product::list(&conn, category, sort_by, sort_order, limit, offset)
        .map_err(|e| format!("Failed to list products: {}", e))?;

    let total = Product::count(&conn, category)
        .map_err(|e| format!("Failed to count products: {}", e))?;

    Ok(ListProductsResponse {
        items: items.iter().map(ProductSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Update a product
pub fn update_product(
    db: &Database,
    id: i64,
    data: ProductUpdate,
) -> Result<UpdateProductResponse, String> {
    if let Some(name) = &data.name {
        if name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Product::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update product: {}", e))?;

    match updated {
        Some(product) => Ok(UpdateProductResponse {
            success: true,
            updated_at: product.updated_at,
            score_cleared: data.affects_score(),
        }),
        None => Err(format!("Product not found with id: {}", id)),
    }
}

/// Delete a product
pub fn delete_product(db: &Database, id: i64) -> Result<DeleteProductResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Product::delete(&conn, id)
        .map_err(|e| format!("Failed to delete product: {}", e))?;

    if !deleted {
        return Err(format!("Product not found with id: {}", id));
    }

    Ok(DeleteProductResponse {
        success: true,
        deleted_id: id,
    })
}
