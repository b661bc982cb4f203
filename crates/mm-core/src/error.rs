use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Please enter a non-empty text prompt.")]
    InvalidInput,

    #[error("generation script failed (exit={code:?}): {detail}")]
    GenerationFailed {
        code: Option<i32>,
        detail: String,
    },

    #[error("no video was produced in {}", dir.display())]
    NoOutputProduced { dir: PathBuf },

    #[error("no unused run id after {attempts} attempts")]
    RunIdsExhausted { attempts: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type GenerationResult<T> = Result<T, GenerationError>;
