pub mod config;
pub mod coordinator;
mod device;
pub mod error;
pub mod invocation;
pub mod retention;
mod run_id;

pub use config::CoordinatorConfig;
pub use coordinator::{GeneratedVideo, RunCoordinator};
pub use device::Device;
pub use error::GenerationError;
pub use invocation::Invocation;
pub use retention::RetentionPolicy;
pub use run_id::{InvalidRunId, RunId, RunIdProvider, UuidRunIds};
