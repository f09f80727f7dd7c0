use dokan::{
    config::{app, database, users},
    core::seed,
    errors::Result,
    web::{self, AppState, TokenService},
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = app::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Initialize database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the catalog and the bootstrap account
    let seeded = seed::seed_initial_products(&db, &app_config.products)
        .await
        .inspect_err(|e| error!("Failed to seed initial products: {}", e))?;
    if seeded > 0 {
        info!("Seeded {} products.", seeded);
    }
    match users::get_bootstrap_user() {
        Some(admin) => seed::seed_bootstrap_user(&db, &admin).await?,
        None => warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set; use /register to create an account."),
    }

    // 6. Serve
    let tokens = TokenService::from_env(app_config.auth.token_ttl_minutes)?;
    let bind = app_config.server.bind.clone();
    let state = AppState::new(db, Arc::new(app_config), tokens);

    web::serve(state, &bind).await
}
