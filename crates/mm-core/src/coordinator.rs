use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};
use chrono::{DateTime, Utc};
use log::{info, warn};
use crate::config::CoordinatorConfig;
use crate::device::Device;
use crate::error::{GenerationError, GenerationResult};
use crate::invocation::Invocation;
use crate::retention;
use crate::run_id::{RunId, RunIdProvider, UuidRunIds};

/// How many times a run id is redrawn when its directory already exists
const MAX_ID_ATTEMPTS: usize = 16;

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub run_id: RunId,
    pub path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl GeneratedVideo {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// Drives one text prompt through the external generation script
pub struct RunCoordinator {
    config: CoordinatorConfig,
    ids: Arc<dyn RunIdProvider>,
    // Single slot for the configured device; held while the script runs
    device_gate: Mutex<()>,
    // Runs between id reservation and return of `generate`
    active: Mutex<HashSet<RunId>>,
}

/// Reservation of a run id; released on drop
struct ActiveRun<'a> {
    run_id: RunId,
    active: &'a Mutex<HashSet<RunId>>,
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        lock(self.active).remove(&self.run_id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RunCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self::with_id_provider(config, Arc::new(UuidRunIds))
    }

    pub fn with_id_provider(config: CoordinatorConfig, ids: Arc<dyn RunIdProvider>) -> Self {
        Self {
            config,
            ids,
            device_gate: Mutex::new(()),
            active: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn device(&self) -> Device {
        self.config.device()
    }

    /// Directory the script writes the animation for `run_id` into
    pub fn animation_dir(&self, run_id: &RunId) -> PathBuf {
        self.config
            .resolved_output_root()
            .join(run_id.as_str())
            .join(&self.config.animation_dir)
    }

    pub fn invocation_for(&self, run_id: &RunId, prompt: &str) -> Invocation {
        Invocation::new(
            &self.config.interpreter,
            &self.config.script,
            self.device(),
            run_id,
            prompt,
        )
        .in_dir(self.config.working_dir.clone())
    }

    /// Run the script for `prompt` and return the video it produced.
    ///
    /// Blocks until the external process exits.
    pub fn generate(&self, prompt: &str) -> GenerationResult<GeneratedVideo> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::InvalidInput);
        }

        let started_at = Utc::now();
        let clock = Instant::now();
        let reservation = self.reserve_run_id()?;
        let run_id = reservation.run_id.clone();
        let invocation = self.invocation_for(&run_id, prompt);

        info!("Starting run {} on {}", run_id, self.device().name());
        self.execute(&invocation)?;

        let dir = self.animation_dir(&run_id);
        let path = find_video(&dir, &self.config.video_extension)?;
        let elapsed = clock.elapsed();
        info!("Run {} produced {} in {:.1}s", run_id, path.display(), elapsed.as_secs_f32());

        Ok(GeneratedVideo {
            run_id,
            path,
            started_at,
            elapsed,
        })
    }

    /// Ids of runs currently in flight
    pub fn active_runs(&self) -> HashSet<RunId> {
        lock(&self.active).clone()
    }

    /// Remove finished run directories idle for longer than `max_age`
    pub fn sweep_expired(&self, max_age: Duration) -> io::Result<usize> {
        let root = self.config.resolved_output_root();
        retention::sweep_expired(&root, max_age, SystemTime::now(), &self.active_runs())
    }

    /// Draw an id that has neither an output directory nor a run in flight
    fn reserve_run_id(&self) -> GenerationResult<ActiveRun<'_>> {
        let root = self.config.resolved_output_root();
        for _ in 0..MAX_ID_ATTEMPTS {
            let run_id = self.ids.next_id();
            if root.join(run_id.as_str()).exists() {
                warn!("Run id {} already has an output directory, drawing another", run_id);
                continue;
            }
            if lock(&self.active).insert(run_id.clone()) {
                return Ok(ActiveRun {
                    run_id,
                    active: &self.active,
                });
            }
            warn!("Run id {} is already in flight, drawing another", run_id);
        }
        Err(GenerationError::RunIdsExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn execute(&self, invocation: &Invocation) -> GenerationResult<()> {
        let _slot = if self.config.serialize_runs {
            Some(lock(&self.device_gate))
        } else {
            None
        };

        let program = invocation.program().to_string_lossy().into_owned();
        let status = invocation.to_command().status().map_err(|e| {
            warn!("Could not launch {}: {}", program, e);
            GenerationError::GenerationFailed {
                code: None,
                detail: format!("failed to launch {program}: {e}"),
            }
        })?;

        if !status.success() {
            warn!("Generation script exited with {}", status);
            return Err(GenerationError::GenerationFailed {
                code: status.code(),
                detail: status.to_string(),
            });
        }

        Ok(())
    }
}

/// First file in `dir` (by name) with extension `ext`
pub fn find_video(dir: &Path, ext: &str) -> GenerationResult<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(GenerationError::NoOutputProduced { dir: dir.to_path_buf() });
        }
        Err(e) => return Err(e.into()),
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|e| e == ext) && entry.file_type()?.is_file() {
            candidates.push(path);
        }
    }

    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::NoOutputProduced { dir: dir.to_path_buf() })
}
