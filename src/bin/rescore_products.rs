//! Recompute stored health scores
//! Usage: cargo run --bin rescore_products -- [product_id]

use hsm::db::{migrations, Database};
use hsm::tools::scoring::{rescore_all, score_product};
use hsm::{build_info, config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init_logging()?;
    build_info::print_startup_banner();

    let product_id = match std::env::args().nth(1) {
        Some(arg) => Some(arg.parse::<i64>().map_err(|_| format!("Invalid product id: {}", arg))?),
        None => None,
    };

    let db_path = config::database_path();
    println!("Database: {}", db_path.display());

    let database = Database::new(&db_path)?;
    database.with_conn(migrations::run_migrations)?;

    match product_id {
        Some(id) => {
            let result = score_product(&database, Some(id), None)?;
            println!(
                "Product {} ({}): health score {} (negative {}, positive {}, fsa {:.1})",
                result.product_id,
                result.category.as_str(),
                result.health_score,
                result.calculation_details.negative_points,
                result.calculation_details.positive_points,
                result.calculation_details.fsa_score
            );
        }
        None => {
            let summary = rescore_all(&database)?;
            println!(
                "Rescored {} products ({} skipped) at {}",
                summary.products_scored, summary.products_skipped, summary.scored_at
            );
        }
    }

    Ok(())
}
