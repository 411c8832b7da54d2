use boxprint::{
    api::{self, AppState},
    bot,
    config::{admins, database, settings},
    core::{auth, storage::LocalObjectStore},
    errors::Result,
};
use dotenvy::dotenv;
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

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Load config.toml (defaults when absent)
    let config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;

    // 4. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Connected to {}", database::get_database_url()))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed admins from config.toml and BOXPRINT_ADMIN_IDS
    let admin_list = admins::merge_admins(&config.admins, admins::get_env_admin_ids());
    if admin_list.is_empty() {
        warn!("No admins configured, admin routes and commands will reject everyone");
    }
    auth::seed_admins(&db, &admin_list)
        .await
        .inspect(|count| info!("Seeded {count} admin(s)"))
        .inspect_err(|e| error!("Failed to seed admins: {e}"))?;

    // 6. Upload storage
    tokio::fs::create_dir_all(&config.storage.root).await?;
    let storage = LocalObjectStore::new(
        config.storage.root.clone(),
        &config.storage.public_base_url,
        config.storage.max_upload_bytes,
    );

    // 7. Discord back office runs alongside the API when a token is present
    match std::env::var("DISCORD_BOT_TOKEN") {
        Ok(token) => {
            let bot_db = db.clone();
            tokio::spawn(async move {
                if let Err(e) = bot::run_bot(&token, bot_db).await {
                    error!("Discord bot stopped: {e}");
                }
            });
        }
        Err(_) => warn!("DISCORD_BOT_TOKEN not set, Discord back office disabled"),
    }

    // 8. Serve the HTTP API until Ctrl-C
    api::serve(AppState::new(db, storage), &config.server.bind_addr).await
}
