use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use saturday_signal::config::{SlateConfig, load_dotenv};
use saturday_signal::server::{SharedFeed, configure_routes};
use saturday_signal::slate::CfbdFeed;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cfg = SlateConfig::from_env();
    if cfg.cfbd_api_key.is_none() {
        info!("CFBD_API_KEY not set; /api/slate will serve the demo slate");
    }
    if cfg.odds.is_active() {
        info!(regions = %cfg.odds.regions, "odds feed enabled");
    }

    let bind_addr = cfg.bind_addr.clone();
    let feed: SharedFeed = Arc::new(CfbdFeed::new(cfg));
    let feed = web::Data::new(feed);

    info!("slate server listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(feed.clone())
            .configure(configure_routes)
            .wrap(middleware::Logger::default())
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
