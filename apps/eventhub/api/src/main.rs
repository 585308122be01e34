//! Event Management API
//!
//! Serves the events HTTP API and runs the status reconciler in the
//! background. Storage is PostgreSQL when `DATABASE_URL` is set, memory
//! otherwise.

use axum_helpers::server::{create_app, health_router};
use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::{
    EventRepository, EventService, InMemoryEventRepository, PgEventRepository,
    ReconcilerScheduler, StatusReconciler,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::Config;

#[derive(Parser)]
#[command(name = "eventhub-api")]
#[command(about = "Event and attendee management service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, Default)]
enum Commands {
    /// Serve the HTTP API (default)
    #[default]
    Serve,

    /// Run a single status reconciliation pass and print the report
    Reconcile,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let cli = Cli::parse();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let command = cli.command.unwrap_or_default();

    match config.database.url.clone() {
        Some(url) => {
            let db = connect(&config, url).await?;
            let repository = Arc::new(PgEventRepository::new(db.clone()));
            let result = run(command, &config, repository).await;

            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
            result?;
        }
        None => {
            warn!("DATABASE_URL is not set, data is kept in memory only");
            run(command, &config, Arc::new(InMemoryEventRepository::new())).await?;
        }
    }

    info!("Event Management API shutdown complete");
    Ok(())
}

async fn connect(config: &Config, url: String) -> eyre::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(config.database.max_connections)
        .connect_timeout(config.database.connect_timeout())
        .sqlx_logging(false);

    info!("Connecting to PostgreSQL...");
    let db = Database::connect(options)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.database.run_migrations {
        Migrator::up(&db, None)
            .await
            .map_err(|e| eyre::eyre!("Database migration failed: {}", e))?;
        info!("Database migrations applied");
    }

    Ok(db)
}

async fn run<R>(command: Commands, config: &Config, repository: Arc<R>) -> eyre::Result<()>
where
    R: EventRepository + 'static,
{
    match command {
        Commands::Serve => serve(config, repository).await,
        Commands::Reconcile => {
            let reconciler = StatusReconciler::new(repository);
            match reconciler.run_once().await? {
                Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                None => warn!("Another reconciliation pass is running"),
            }
            Ok(())
        }
    }
}

async fn serve<R>(config: &Config, repository: Arc<R>) -> eyre::Result<()>
where
    R: EventRepository + 'static,
{
    let service = EventService::from_shared(repository.clone());
    let api_routes = api::routes(service).merge(health_router(config.app));

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    let scheduler = if config.scheduler.enabled {
        let reconciler = Arc::new(StatusReconciler::new(repository));
        let scheduler = ReconcilerScheduler::start(reconciler, config.scheduler.interval())
            .await
            .map_err(|e| eyre::eyre!("Failed to start status reconciler: {}", e))?;
        Some(scheduler)
    } else {
        info!("Status reconciler disabled (RECONCILE_ENABLED=false)");
        None
    };

    info!("Starting {} v{}", config.app.name, config.app.version);
    let served = create_app(router, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e));

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::error!("Error stopping status reconciler: {}", e);
        }
    }

    served
}
