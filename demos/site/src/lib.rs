//! Demo site served through the MVC dispatcher.
//!
//! ```text
//! GET /                 → home/index   (alternates between a view and a literal)
//! GET /home/about       → literal
//! GET /home/promise     → async literal
//! GET /home/<anything>  → catchAll, redirects to {mount}home/index
//! GET /health           → host route, reached because no controller claims it
//! ```

pub mod config;
pub mod controllers;
pub mod views;

use axum::{http::StatusCode, routing::get, Router};
use config::Config;
use controllers::home::Permissions;
use mvc_dispatch_core::Dispatcher;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router.
#[must_use]
pub fn app(config: &Config) -> Router {
    let dispatcher = Dispatcher::new(
        controllers::registry(Permissions::default()),
        config.dispatch.clone(),
    )
    .with_view_engine(Arc::new(views::SiteViews::default()));

    let next = Router::new()
        .route("/health", get(health_check))
        .fallback(not_found);

    mvc_dispatch_web::router(dispatcher, next).layer(TraceLayer::new_for_http())
}

#[allow(clippy::unused_async)]
async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[allow(clippy::unused_async)]
async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
