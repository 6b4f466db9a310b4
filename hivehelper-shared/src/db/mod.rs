/// Database layer for HiveHelper
///
/// This module provides PostgreSQL connection pooling and migrations.
///
/// # Modules
///
/// - `pool`: Connection pool management with health checks
/// - `migrations`: Migration runner for the `migrations/` directory
///
/// Models and their queries live in the `models` module at crate root level.
///
/// # Example
///
/// ```no_run
/// use hivehelper_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
