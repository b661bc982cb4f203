use std::sync::Arc;
use axum::extract::State;
use axum::response::Html;
use crate::backend::state::AppState;
use crate::ui;

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(ui::render_index(state.generator.device()))
}

pub async fn healthz() -> &'static str {
    "ok"
}
