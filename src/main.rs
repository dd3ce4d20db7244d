use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use products_api::config::Config;
use products_api::middleware::RequestLog;
use products_api::repository::ProductRepository;
use products_api::configure_app;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Unexpected panics are logged but do not take the process down; no
    // operation here is multi-step, so there is no in-flight state to corrupt.
    std::panic::set_hook(Box::new(|info| {
        error!(panic = %info, "unexpected panic");
    }));

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    if config.verify_store {
        // Startup policy: serving against an unreachable store is fatal.
        let conn = pool
            .acquire()
            .await
            .context("could not connect to the store at startup")?;
        drop(conn);
        info!("connected to the store");
    } else {
        info!("startup store check skipped (SKIP_DB_CHECK)");
    }

    let repo = web::Data::new(ProductRepository::new(pool.clone()));

    info!(port = config.port, "server listening");
    HttpServer::new(move || {
        App::new()
            .wrap(RequestLog)
            .wrap(Cors::permissive())
            .configure(configure_app(repo.clone()))
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    pool.close().await;
    Ok(())
}
