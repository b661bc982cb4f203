use std::sync::Arc;
use axum::extract::State;
use axum::Json;
use mm_core::RunId;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::info;
use crate::backend::schemas::{GenerateRequest, GenerateResponse};
use crate::backend::state::AppState;
use crate::error::AppError;

/// Characters escaped inside one URL path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn video_url(run_id: &RunId, file_name: &str) -> String {
    format!("/videos/{}/{}", run_id, utf8_percent_encode(file_name, SEGMENT))
}

pub async fn generate_motion(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let generator = &state.generator;
    let video = generator.generate(req.prompt).await?;

    let file_name = video
        .file_name()
        .ok_or_else(|| AppError::UnservableOutput(video.path.display().to_string()))?
        .to_string();
    info!("Run {} ready: {}", video.run_id, file_name);

    Ok(Json(GenerateResponse {
        video_url: video_url(&video.run_id, &file_name),
        run_id: video.run_id.to_string(),
        file_name,
        device: generator.device().name(),
        started_at: video.started_at,
        elapsed_ms: u64::try_from(video.elapsed.as_millis()).unwrap_or(u64::MAX),
    }))
}
