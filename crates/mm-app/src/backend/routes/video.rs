use std::sync::Arc;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use crate::backend::state::AppState;
use crate::error::AppError;

/// Stream a produced video, honouring `Range` requests
pub async fn serve_video(
    State(state): State<Arc<AppState>>,
    Path((run_id, file)): Path<(String, String)>,
    req: Request,
) -> Result<Response, AppError> {
    let path = state.generator.video_path(&run_id, &file)?;

    let resp = match ServeFile::new(&path).oneshot(req).await {
        Ok(resp) => resp,
        Err(never) => match never {},
    };

    if resp.status() == StatusCode::NOT_FOUND {
        return Err(AppError::VideoNotFound);
    }
    Ok(resp.into_response())
}
