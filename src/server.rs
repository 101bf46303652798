use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::warn;

use crate::slate::{DemoReason, SlateFeed, SlateOutcome, build_slate};

pub type SharedFeed = Arc<dyn SlateFeed>;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/slate", web::get().to(get_slate))
        .route("/health", web::get().to(health_check));
}

/// Always 200. Any failure, including a panicked worker, yields the demo slate.
pub async fn get_slate(feed: web::Data<SharedFeed>) -> HttpResponse {
    let feed = Arc::clone(feed.get_ref());
    let now = Utc::now();
    let outcome = match web::block(move || build_slate(feed.as_ref(), now)).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(error = %err, "slate worker failed; serving demo slate");
            SlateOutcome::Demo(DemoReason::WorkerFailed(err.to_string()))
        }
    };
    HttpResponse::Ok().json(outcome.into_response(now))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "slate-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
