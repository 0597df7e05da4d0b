use dotenvy::dotenv;
use presupuesto::{api, config, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::AppConfig::from_env()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;

    // 4. Initialize database
    let db = config::database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database connected successfully."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Run the server
    api::routes::serve(app_config, db).await
}
