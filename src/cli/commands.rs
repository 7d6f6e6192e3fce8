use crate::api::{build_router, AppState};
use crate::cli::{Cli, Commands};
use crate::k8s::{default_providers, ServiceAccountLauncher};
use crate::metrics::HttpMetrics;
use crate::store::{ItemStore, PgItemStore};
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

pub async fn handle_command(cli: Cli) -> Result<()> {
    match cli.command.clone().unwrap_or(Commands::Serve) {
        Commands::Serve => handle_serve(cli).await,
        Commands::InitDb => handle_init_db(cli).await,
    }
}

async fn handle_serve(cli: Cli) -> Result<()> {
    let info = cli.app.info();
    info!("Starting {} v{}", info.name, info.version);

    let store = Arc::new(PgItemStore::new(cli.database.settings()));
    if let Err(e) = store.ensure_schema().await {
        warn!("Could not initialize the items table: {}", e);
    }

    let metrics = HttpMetrics::new().context("Failed to create metrics registry")?;
    let launcher = Arc::new(ServiceAccountLauncher::new(
        default_providers(),
        cli.server.namespace.clone(),
    ));

    let state = Arc::new(AppState::new(info.clone(), store, launcher, metrics));
    let app = build_router(state);

    let addr = cli.server.listen_addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Stopping {}", info.name);
    Ok(())
}

async fn handle_init_db(cli: Cli) -> Result<()> {
    let settings = cli.database.settings();
    println!("Connecting to the database...");
    println!("   Host: {}:{}", settings.host, settings.port);
    println!("   Database: {}", settings.name);
    println!("   User: {}", settings.user);

    let store = PgItemStore::new(settings);
    let report = match store.initialize_and_inspect().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Database initialization failed: {}", e);
            eprintln!("Check that:");
            eprintln!("   - PostgreSQL is running");
            eprintln!("   - the DB_* environment variables are correct");
            eprintln!("   - the database exists");
            return Err(e).context("init-db failed");
        }
    };

    if !report.exists {
        bail!("Table 'items' could not be created");
    }

    println!("Table 'items' created or verified");
    println!();
    println!("Structure of table 'items':");
    for column in &report.columns {
        println!(
            "   - {}: {} ({})",
            column.column_name,
            column.data_type,
            column.nullability()
        );
    }
    println!();
    println!("Rows in table 'items': {}", report.row_count);

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
