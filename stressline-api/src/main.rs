//! stressline-api - Experiment content and scoring service
//!
//! Serves stratified timeline content to participants and records VAS
//! scores at session checkpoints. Content is loaded once at startup; the
//! score ledger lives in a SQLite store under the root folder.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use stressline_api::{build_router, AppState, ContentCatalog};
use stressline_common::config;
use stressline_common::db::init_database;

#[derive(Debug, Parser)]
#[command(name = "stressline-api", version)]
struct Args {
    /// Root folder holding the database and the data/ directory of CSVs
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5730, env = "STRESSLINE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting stressline-api v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Step 1: Resolve root folder and make sure it exists
    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    // Step 2: Load the content catalog; bad datasets degrade per table
    let catalog = ContentCatalog::load(&root_folder);

    // Step 3: Open or create the experiment log store. A failure here must
    // not take down content serving; score writes will answer 500 instead.
    let db_path = config::database_path(&root_folder);
    let db = match init_database(&db_path).await {
        Ok(pool) => {
            info!("Experiment log store: {}", db_path.display());
            Some(pool)
        }
        Err(err) => {
            warn!(
                "Running without an experiment log store ({}): {}",
                db_path.display(),
                err
            );
            None
        }
    };

    // Step 4: Application state and router
    let state = AppState::new(db, catalog);
    let app = build_router(state);

    // Step 5: Serve
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("stressline-api listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
