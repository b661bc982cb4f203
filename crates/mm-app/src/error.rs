use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mm_core::GenerationError;
use thiserror::Error;
use tracing::{error, warn};
use crate::backend::schemas::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("generation task stopped unexpectedly: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("invalid video reference: {0}")]
    BadVideoRef(String),

    #[error("video not found")]
    VideoNotFound,

    #[error("output file name is not valid UTF-8: {0}")]
    UnservableOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Message shown in the page's error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(GenerationError::InvalidInput) => {
                "Please enter a non-empty text prompt.".to_string()
            }
            Self::Generation(GenerationError::GenerationFailed { detail, .. }) => {
                format!("Generation failed. See logs. (Error: {detail})")
            }
            Self::Generation(GenerationError::NoOutputProduced { .. }) => {
                "No video file was generated. Please check server logs.".to_string()
            }
            Self::Generation(GenerationError::Io(_) | GenerationError::RunIdsExhausted { .. })
            | Self::Io(_)
            | Self::Worker(_)
            | Self::UnservableOutput(_) => {
                "Something went wrong while collecting the video. Please check server logs."
                    .to_string()
            }
            Self::BadVideoRef(_) => "Invalid video reference.".to_string(),
            Self::VideoNotFound => "Video not found.".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Generation(GenerationError::InvalidInput) | Self::BadVideoRef(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::VideoNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        let body = ErrorResponse {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::from(GenerationError::InvalidInput).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(GenerationError::NoOutputProduced {
                dir: PathBuf::from("generation")
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::VideoNotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_failure_message_carries_exit_detail() {
        let err = AppError::from(GenerationError::GenerationFailed {
            code: Some(1),
            detail: "exit status: 1".to_string(),
        });
        assert_eq!(err.user_message(), "Generation failed. See logs. (Error: exit status: 1)");
    }
}
