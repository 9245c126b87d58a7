//! Alumni API server binary.
//!
//! Connects the configured record store, makes sure the built-in roles
//! exist, sweeps orphaned uploads and serves the REST API until Ctrl-C.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use alumni_api::AppState;
use alumni_api::config::ApiConfig;
use alumni_core::seed::{DEFAULT_SEED_PASSWORD, ensure_roles, seed_demo};
use alumni_core::store::Store;

/// Record store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Postgres,
    Mongo,
    /// Volatile; for local development.
    Memory,
}

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "alumni_server", about = "Alumni records API server")]
struct Args {
    /// Record store backend.
    #[arg(long, env = "STORE", value_enum, default_value_t = StoreKind::Postgres)]
    store: StoreKind,

    /// PostgreSQL or MongoDB connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/alumni"
    )]
    database_url: String,

    /// MongoDB database name.
    #[arg(long, env = "MONGO_DATABASE", default_value = "alumni")]
    mongo_database: String,

    /// Maximum number of PostgreSQL connections in the pool.
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// HMAC secret for access tokens (at least 32 characters).
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Key for `POST /alumni/check/{key}`. The endpoint rejects every
    /// request when unset.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory uploads are written to.
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    upload_dir: String,

    /// Interface to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "APP_PORT", default_value_t = 3000)]
    port: u16,

    /// Insert demo alumni when the store is empty.
    #[arg(long, env = "SEED", default_value_t = false)]
    seed: bool,

    /// Password for the seeded demo accounts.
    #[arg(long, env = "SEED_PASSWORD", default_value = DEFAULT_SEED_PASSWORD, hide_env_values = true)]
    seed_password: String,
}

async fn connect(args: &Args) -> Result<Store, Box<dyn std::error::Error>> {
    match args.store {
        StoreKind::Postgres => {
            info!(max_connections = args.max_connections, "connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&args.database_url)
                .await?;

            info!("running database migrations");
            alumni_core::migrate::migrate(&pool).await?;
            Ok(Store::postgres(pool))
        }
        StoreKind::Mongo => {
            info!(database = %args.mongo_database, "connecting to MongoDB");
            let client = mongodb::Client::with_uri_str(&args.database_url).await?;
            let db = client.database(&args.mongo_database);
            alumni_core::store::mongo::ensure_indexes(&db).await?;
            Ok(Store::mongo(db))
        }
        StoreKind::Memory => {
            warn!("using the in-memory store; data is lost on exit");
            Ok(Store::memory())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        return std::future::pending().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,alumni_api=debug,alumni_core=debug".into()),
        )
        .init();

    let args = Args::parse();
    info!(
        version = alumni_core::version(),
        store = ?args.store,
        port = args.port,
        "starting alumni_server"
    );

    let config = ApiConfig::new(format!("{}:{}", args.host, args.port), &args.jwt_secret)
        .with_api_key(args.api_key.clone())
        .with_upload_dir(&args.upload_dir);

    let store = connect(&args).await?;
    let roles = ensure_roles(&store).await?;
    info!(admin = %roles.admin.id, user = %roles.user.id, "built-in roles ready");
    if args.seed && seed_demo(&store, &args.seed_password).await? {
        info!("demo data seeded");
    }

    let state = AppState::new(store, config)?;
    if state.config.api_key.is_none() {
        warn!("API_KEY is not set; the alumni check endpoint will reject every request");
    }

    state.storage.ensure_dirs().await?;
    alumni_api::services::uploads::sweep_orphans(&state.store, &state.storage).await?;

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let app = alumni_api::router(state);

    info!(addr = %local_addr, "REST API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
