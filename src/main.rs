//! Health Score Manager (HSM)
//!
//! An MCP server that scores food and beverage products.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};

use hsm::mcp::HsmService;
use hsm::{build_info, config, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init_logging()?;

    build_info::print_startup_banner();

    let db_path = config::database_path();
    tracing::info!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            tracing::info!("Migrating database schema");
            db::migrations::run_migrations(conn)?;
        }
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!("Database schema version: {}", version);
        Ok(())
    })?;

    let service = HsmService::new(db_path, database);

    tracing::info!("Starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
