use std::sync::Arc;
use axum::Router;
use axum::routing::{get, post};
use crate::backend::routes::generate::generate_motion;
use crate::backend::routes::page::{healthz, index};
use crate::backend::routes::video::serve_video;
use crate::backend::state::AppState;

mod generate;
mod page;
mod video;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/generate", post(generate_motion))
        .route("/videos/{run_id}/{file}", get(serve_video))
}
