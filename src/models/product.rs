//! Product model
//!
//! A packaged food or beverage with its raw label data and last score.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::scoring::{CalculationDetails, Category, HealthScore, NutritionRecord};

/// A stored product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
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

/// Data for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub nutrition: NutritionRecord,
    pub notes: Option<String>,
}

/// Data for updating a product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<Category>,
    pub nutrition: Option<NutritionRecord>,
    pub notes: Option<String>,
}

impl ProductUpdate {
    /// Whether applying this update invalidates a stored score
    pub fn affects_score(&self) -> bool {
        self.category.is_some() || self.nutrition.is_some()
    }
}

/// Parse a stored nutrition document; damage is logged and read as empty
fn nutrition_from_column(id: i64, text: &str) -> NutritionRecord {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => NutritionRecord::from_value(value),
        Err(e) => {
            tracing::warn!("Product {} has unreadable nutrition data: {}", id, e);
            NutritionRecord::new()
        }
    }
}

impl Product {
    /// Create a Product from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id: i64 = row.get("id")?;
        let nutrition: String = row.get("nutrition")?;
        let health_score: Option<i64> = row.get("health_score")?;
        let negative_points: Option<u32> = row.get("negative_points")?;
        let positive_points: Option<u32> = row.get("positive_points")?;
        let fsa_score: Option<f64> = row.get("fsa_score")?;

        let calculation_details = match (negative_points, positive_points, fsa_score) {
            (Some(negative_points), Some(positive_points), Some(fsa_score)) => {
                Some(CalculationDetails {
                    negative_points,
                    positive_points,
                    fsa_score,
                })
            }
            _ => None,
        };

        Ok(Self {
            id,
            name: row.get("name")?,
            brand: row.get("brand")?,
            category: Category::from_is_beverage(row.get("is_beverage")?),
            nutrition: nutrition_from_column(id, &nutrition),
            health_score: health_score.and_then(|s| u8::try_from(s).ok()),
            calculation_details,
            health_score_updated_at: row.get("health_score_updated_at")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new product into the database
    pub fn create(conn: &Connection, data: &ProductCreate) -> DbResult<Self> {
        let nutrition = serde_json::to_string(&data.nutrition)?;
        conn.execute(
            r#"
            INSERT INTO products (name, brand, is_beverage, nutrition, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name,
                data.brand,
                data.category.is_beverage(),
                nutrition,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a product by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM products WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search products by name or brand
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM products
            WHERE name LIKE ?1 OR brand LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// List products with optional category filter and sorting
    pub fn list(
        conn: &Connection,
        category: Option<Category>,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order_column = match sort_by {
            "created_at" => "created_at",
            "health_score" => "health_score",
            _ => "name",
        };
        let order_dir = if sort_order.eq_ignore_ascii_case("desc") {
            "DESC"
        } else {
            "ASC"
        };

        let sql = format!(
            "SELECT * FROM products WHERE (?1 IS NULL OR is_beverage = ?1) \
             ORDER BY {} {}, id ASC LIMIT ?2 OFFSET ?3",
            order_column, order_dir
        );
        let mut stmt = conn.prepare(&sql)?;
        let flag = category.map(|c| c.is_beverage());

        let items = stmt
            .query_map(params![flag, limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Count products, optionally by category
    pub fn count(conn: &Connection, category: Option<Category>) -> DbResult<i64> {
        let flag = category.map(|c| c.is_beverage());
        let count = conn.query_row(
            "SELECT COUNT(*) FROM products WHERE (?1 IS NULL OR is_beverage = ?1)",
            params![flag],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count products that have a stored score
    pub fn count_scored(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM products WHERE health_score IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// IDs of every product, ascending
    pub fn all_ids(conn: &Connection) -> DbResult<Vec<i64>> {
        let mut stmt = conn.prepare("SELECT id FROM products ORDER BY id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Update a product
    ///
    /// Changing the nutrition or the category clears the stored score.
    pub fn update(conn: &Connection, id: i64, data: &ProductUpdate) -> DbResult<Option<Self>> {
        let Some(current) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        let name = data.name.as_ref().unwrap_or(&current.name);
        let brand = data.brand.as_ref().or(current.brand.as_ref());
        let category = data.category.unwrap_or(current.category);
        let nutrition = data.nutrition.as_ref().unwrap_or(&current.nutrition);
        let notes = data.notes.as_ref().or(current.notes.as_ref());

        // A stale score is nulled in the same statement as the edit
        conn.execute(
            r#"
            UPDATE products SET
                name = ?1, brand = ?2, is_beverage = ?3, nutrition = ?4, notes = ?5,
                health_score = CASE WHEN ?7 THEN NULL ELSE health_score END,
                negative_points = CASE WHEN ?7 THEN NULL ELSE negative_points END,
                positive_points = CASE WHEN ?7 THEN NULL ELSE positive_points END,
                fsa_score = CASE WHEN ?7 THEN NULL ELSE fsa_score END,
                health_score_updated_at = CASE WHEN ?7 THEN NULL ELSE health_score_updated_at END,
                updated_at = datetime('now')
            WHERE id = ?6
            "#,
            params![
                name,
                brand,
                category.is_beverage(),
                serde_json::to_string(nutrition)?,
                notes,
                id,
                data.affects_score(),
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Store a computed score, overwriting any previous one
    ///
    /// The category the score was computed under is written alongside it, so
    /// the stored category always matches the stored score. Returns false if
    /// the product no longer exists.
    pub fn save_score(
        conn: &Connection,
        id: i64,
        category: Category,
        score: &HealthScore,
        scored_at: &str,
    ) -> DbResult<bool> {
        let details = &score.calculation_details;
        let changed = conn.execute(
            r#"
            UPDATE products SET
                health_score = ?1, negative_points = ?2, positive_points = ?3,
                fsa_score = ?4, health_score_updated_at = ?5, is_beverage = ?6
            WHERE id = ?7
            "#,
            params![
                score.health_score,
                details.negative_points,
                details.positive_points,
                details.fsa_score,
                scored_at,
                category.is_beverage(),
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a product; returns false if it did not exist
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let deleted = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::scoring::compute_health_score;
    use serde_json::json;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn cola() -> ProductCreate {
        ProductCreate {
            name: "Cola".to_string(),
            brand: Some("Fizz Co".to_string()),
            category: Category::Beverage,
            nutrition: NutritionRecord::from_value(json!({
                "energy": "42kcal",
                "sugars": "10.6g",
                "sodium": "10mg"
            })),
            notes: None,
        }
    }

    fn oats() -> ProductCreate {
        ProductCreate {
            name: "Rolled Oats".to_string(),
            brand: None,
            category: Category::Food,
            nutrition: NutritionRecord::from_value(json!({
                "energy": "1550kJ",
                "sugars": "1g",
                "dietaryFiber": "10g",
                "protein": "13g"
            })),
            notes: Some("bulk bag".to_string()),
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let created = Product::create(&conn, &cola()).unwrap();
        assert_eq!(created.name, "Cola");
        assert_eq!(created.category, Category::Beverage);
        assert_eq!(created.health_score, None);
        assert_eq!(created.calculation_details, None);

        let fetched = Product::get_by_id(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched.nutrition, cola().nutrition);
        assert!(Product::get_by_id(&conn, 9999).unwrap().is_none());
    }

    #[test]
    fn test_search_and_list() {
        let conn = setup();
        Product::create(&conn, &cola()).unwrap();
        Product::create(&conn, &oats()).unwrap();

        let found = Product::search(&conn, "fizz", 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Cola");

        let all = Product::list(&conn, None, "name", "asc", 10, 0).unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cola", "Rolled Oats"]);

        let drinks = Product::list(&conn, Some(Category::Beverage), "name", "asc", 10, 0).unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(Product::count(&conn, Some(Category::Food)).unwrap(), 1);
        assert_eq!(Product::count(&conn, None).unwrap(), 2);
    }

    #[test]
    fn test_save_score_overwrites() {
        let conn = setup();
        let product = Product::create(&conn, &oats()).unwrap();
        let score = compute_health_score(&product.nutrition, product.category);

        assert!(Product::save_score(&conn, product.id, product.category, &score, "2026-01-01T00:00:00Z").unwrap());
        assert!(Product::save_score(&conn, product.id, product.category, &score, "2026-01-02T00:00:00Z").unwrap());

        let stored = Product::get_by_id(&conn, product.id).unwrap().unwrap();
        assert_eq!(stored.health_score, Some(score.health_score));
        assert_eq!(stored.calculation_details, Some(score.calculation_details));
        assert_eq!(stored.health_score_updated_at.as_deref(), Some("2026-01-02T00:00:00Z"));
        assert_eq!(Product::count_scored(&conn).unwrap(), 1);

        assert!(!Product::save_score(&conn, 9999, Category::Food, &score, "2026-01-02T00:00:00Z").unwrap());
    }

    #[test]
    fn test_nutrition_update_clears_score() {
        let conn = setup();
        let product = Product::create(&conn, &oats()).unwrap();
        let score = compute_health_score(&product.nutrition, product.category);
        Product::save_score(&conn, product.id, product.category, &score, "2026-01-01T00:00:00Z").unwrap();

        let renamed = Product::update(
            &conn,
            product.id,
            &ProductUpdate {
                name: Some("Jumbo Oats".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(renamed.name, "Jumbo Oats");
        assert_eq!(renamed.health_score, Some(score.health_score));

        let changed = Product::update(
            &conn,
            product.id,
            &ProductUpdate {
                category: Some(Category::Beverage),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(changed.category, Category::Beverage);
        assert_eq!(changed.health_score, None);
        assert_eq!(changed.notes.as_deref(), Some("bulk bag"));
    }

    #[test]
    fn test_nutrition_update_nulls_every_score_column() {
        let conn = setup();
        let product = Product::create(&conn, &cola()).unwrap();
        let score = compute_health_score(&product.nutrition, product.category);
        Product::save_score(&conn, product.id, product.category, &score, "2026-01-01T00:00:00Z").unwrap();

        let updated = Product::update(
            &conn,
            product.id,
            &ProductUpdate {
                nutrition: Some(NutritionRecord::from_value(json!({"energy": "0kcal"}))),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.health_score, None);
        assert_eq!(updated.calculation_details, None);
        assert_eq!(updated.health_score_updated_at, None);
        assert_eq!(Product::count_scored(&conn).unwrap(), 0);

        let columns: (Option<i64>, Option<i64>, Option<f64>) = conn
            .query_row(
                "SELECT negative_points, positive_points, fsa_score FROM products WHERE id = ?1",
                [product.id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(columns, (None, None, None));
    }

    #[test]
    fn test_save_score_records_category() {
        let conn = setup();
        let product = Product::create(&conn, &oats()).unwrap();
        let score = compute_health_score(&product.nutrition, Category::Beverage);

        assert!(Product::save_score(&conn, product.id, Category::Beverage, &score, "2026-01-01T00:00:00Z").unwrap());

        let stored = Product::get_by_id(&conn, product.id).unwrap().unwrap();
        assert_eq!(stored.category, Category::Beverage);
        assert_eq!(stored.health_score, Some(score.health_score));
        assert_eq!(stored.nutrition, oats().nutrition);
    }

    #[test]
    fn test_corrupt_nutrition_reads_as_empty() {
        let conn = setup();
        conn.execute(
            "INSERT INTO products (name, nutrition) VALUES ('Broken', 'not json')",
            [],
        )
        .unwrap();
        let id = conn.last_insert_rowid();
        let product = Product::get_by_id(&conn, id).unwrap().unwrap();
        assert!(product.nutrition.is_empty());
    }

    #[test]
    fn test_delete() {
        let conn = setup();
        let product = Product::create(&conn, &cola()).unwrap();
        assert!(Product::delete(&conn, product.id).unwrap());
        assert!(!Product::delete(&conn, product.id).unwrap());
        assert_eq!(Product::all_ids(&conn).unwrap(), Vec::<i64>::new());
    }
}
