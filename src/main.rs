use std::{process, sync::Arc, time::Instant};

use bandstand::{
    application::{
        content::{ContentRepos, ContentService},
        error::AppError,
        repos::HealthRepo,
    },
    cache::{CacheConfig, CacheRegistry, CacheSweeper},
    config,
    infra::{
        cache_warmer::CacheWarmer,
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
    },
};
use tokio::{sync::watch, try_join};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let started_at = Instant::now();
    let repositories = init_repositories(&settings).await?;

    repositories
        .ping()
        .await
        .map_err(InfraError::Unreachable)?;
    info!(target = "bandstand::startup", "database reachable");

    let cache_config = CacheConfig::from(&settings.cache);
    let cache = Arc::new(CacheRegistry::new(cache_config.clone()));
    let content = Arc::new(ContentService::new(
        cache.clone(),
        ContentRepos::from_shared(repositories.clone()),
    ));

    if cache_config.enabled && cache_config.warm_on_startup {
        let report = CacheWarmer::new(content.clone()).warm_initial().await;
        if !report.is_complete() {
            warn!(
                target = "bandstand::startup",
                failed = report.failed.len(),
                "cache warm incomplete, continuing startup"
            );
        }
    }

    let sweeper = CacheSweeper::spawn(cache.clone());

    let health: Arc<dyn HealthRepo> = repositories;
    let http_state = HttpState {
        content: content.clone(),
        health: health.clone(),
    };
    let admin_state = AdminState {
        content,
        cache,
        health,
        started_at,
    };

    let result = serve_http(&settings, http_state, admin_state).await;

    sweeper.shutdown().await;

    result
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    info!(target = "bandstand::migrate", "migrations applied");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or(InfraError::MissingDatabaseUrl)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::Connect)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_addr = settings.server.public_addr;
    let admin_addr = settings.server.admin_addr;
    let public_listener = tokio::net::TcpListener::bind(public_addr)
        .await
        .map_err(InfraError::bind("public", public_addr))?;
    let admin_listener = tokio::net::TcpListener::bind(admin_addr)
        .await
        .map_err(InfraError::bind("admin", admin_addr))?;

    info!(
        target = "bandstand::startup",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listening"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(target = "bandstand::shutdown", "shutdown signal received");
        }
        let _ = shutdown_tx.send(true);
    });

    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));

    let servers = async { try_join!(public_server, admin_server) };
    let deadline = {
        let grace = settings.server.graceful_shutdown;
        let shutdown_rx = shutdown_rx.clone();
        async move {
            wait_for_shutdown(shutdown_rx).await;
            tokio::time::sleep(grace).await;
        }
    };

    tokio::select! {
        result = servers => {
            result.map_err(InfraError::Serve)?;
        }
        () = deadline => {
            warn!(target = "bandstand::shutdown", "graceful shutdown timed out");
        }
    }

    Ok(())
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stopped| *stopped).await;
}
