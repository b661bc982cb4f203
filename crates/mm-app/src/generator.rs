use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use mm_core::{CoordinatorConfig, Device, GeneratedVideo, RunCoordinator, RunId};
use crate::error::AppError;

/// Async front of the blocking run coordinator
#[derive(Clone)]
pub struct Generator {
    coordinator: Arc<RunCoordinator>,
}

impl Generator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self::from_coordinator(RunCoordinator::new(config))
    }

    pub fn from_coordinator(coordinator: RunCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    pub fn device(&self) -> Device {
        self.coordinator.device()
    }

    /// Run one generation on the blocking pool
    pub async fn generate(&self, prompt: String) -> Result<GeneratedVideo, AppError> {
        let coordinator = self.coordinator.clone();
        let video = tokio::task::spawn_blocking(move || coordinator.generate(&prompt)).await??;
        Ok(video)
    }

    /// Location of `file` inside the animation dir of `run_id`
    pub fn video_path(&self, run_id: &str, file: &str) -> Result<PathBuf, AppError> {
        let run_id: RunId = run_id
            .parse()
            .map_err(|e: mm_core::InvalidRunId| AppError::BadVideoRef(e.to_string()))?;

        let plain_name = !file.is_empty()
            && file != "."
            && file != ".."
            && !file.contains(['/', '\\', '\0']);
        if !plain_name {
            return Err(AppError::BadVideoRef(format!("bad file name {file:?}")));
        }

        Ok(self.coordinator.animation_dir(&run_id).join(file))
    }

    /// Drop finished run directories idle for longer than `max_age`
    pub async fn sweep(&self, max_age: Duration) -> Result<usize, AppError> {
        let coordinator = self.coordinator.clone();
        let removed =
            tokio::task::spawn_blocking(move || coordinator.sweep_expired(max_age)).await??;
        Ok(removed)
    }
}
