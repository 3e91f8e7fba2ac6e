use std::{process, sync::Arc, time::Duration};

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

use tribuna::{
    application::{feeds::FeedService, posts::PostService, social::SocialGraphService},
    cache::{CacheConfig, FeedCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{AppState, build_router},
        telemetry,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &InfraError) {
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

async fn run() -> Result<(), InfraError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn connect_and_migrate(settings: &config::Settings) -> Result<sqlx::PgPool, InfraError> {
    let pool = PostgresRepositories::connect(
        &settings.database.url,
        settings.database.max_connections,
    )
    .await
    .map_err(|err| InfraError::database(format!("failed to connect to database: {err}")))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(format!("failed to run migrations: {err}")))?;

    Ok(pool)
}

async fn run_migrate(settings: config::Settings) -> Result<(), InfraError> {
    connect_and_migrate(&settings).await?;
    info!("migrations applied");
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), InfraError> {
    let pool = connect_and_migrate(&settings).await?;

    let repos = Arc::new(PostgresRepositories::new(pool));
    let cache = Arc::new(FeedCache::new(CacheConfig::with_ttl(
        settings.cache.feed_ttl,
    )));

    let social = SocialGraphService::new(repos.clone(), repos.clone());
    let feeds = FeedService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        social.clone(),
        cache,
    );
    let posts = PostService::new(repos.clone(), repos.clone(), repos.clone());

    let state = AppState {
        feeds,
        posts,
        social,
        db: Some(repos),
    };
    let router = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    let grace = settings.server.graceful_shutdown;
    let (draining_tx, draining_rx) = watch::channel(false);
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = draining_tx.send(true);
    });
    let server = std::future::IntoFuture::into_future(server);
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = drain_deadline(draining_rx, grace) => {
            warn!(
                grace_seconds = grace.as_secs(),
                "grace period elapsed; dropping remaining connections"
            );
        }
    }

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}

/// Resolves `grace` after the drain starts, never before. Racing this
/// against the server bounds how long open connections can hold up exit.
async fn drain_deadline(mut draining: watch::Receiver<bool>, grace: Duration) {
    if draining.changed().await.is_ok() {
        tokio::time::sleep(grace).await;
    } else {
        std::future::pending::<()>().await;
    }
}
