use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};
use log::{info, warn};
use walkdir::WalkDir;
use crate::run_id::RunId;

/// How long run directories are kept on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    #[default]
    KeepForever,
    MaxAge(Duration),
}

impl RetentionPolicy {
    pub fn from_secs(secs: Option<u64>) -> Self {
        match secs {
            Some(secs) => Self::MaxAge(Duration::from_secs(secs)),
            None => Self::KeepForever,
        }
    }

    pub fn max_age(&self) -> Option<Duration> {
        match self {
            Self::KeepForever => None,
            Self::MaxAge(age) => Some(*age),
        }
    }
}

/// Latest modification time of `dir` or anything below it
fn last_touched(dir: &Path) -> io::Result<SystemTime> {
    let mut newest = fs::metadata(dir)?.modified()?;
    for entry in WalkDir::new(dir).min_depth(1) {
        let modified = entry?.metadata()?.modified()?;
        newest = newest.max(modified);
    }
    Ok(newest)
}

/// Remove run directories under `output_root` in which nothing changed for
/// more than `max_age` before `now`. Runs listed in `active` and entries whose
/// name is not a run id are left alone.
pub fn sweep_expired(
    output_root: &Path,
    max_age: Duration,
    now: SystemTime,
    active: &HashSet<RunId>,
) -> io::Result<usize> {
    let entries = match fs::read_dir(output_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(run_id) = name.to_str().and_then(|n| n.parse::<RunId>().ok()) else {
            continue;
        };
        if !entry.file_type()?.is_dir() || active.contains(&run_id) {
            continue;
        }

        let touched = match last_touched(&entry.path()) {
            Ok(touched) => touched,
            Err(e) => {
                warn!("Could not inspect run {}: {}", run_id, e);
                continue;
            }
        };
        let age = now.duration_since(touched).unwrap_or_default();
        if age <= max_age {
            continue;
        }

        match fs::remove_dir_all(entry.path()) {
            Ok(()) => {
                info!("Removed run {} ({}s idle)", run_id, age.as_secs());
                removed += 1;
            }
            Err(e) => warn!("Could not remove run {}: {}", run_id, e),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use tempfile::TempDir;
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn backdate(path: &Path, to: SystemTime) {
        File::open(path).unwrap().set_modified(to).unwrap();
    }

    fn sweep(root: &Path, max_age: Duration, now: SystemTime) -> usize {
        sweep_expired(root, max_age, now, &HashSet::new()).unwrap()
    }

    #[test]
    fn test_policy_from_secs() {
        assert_eq!(RetentionPolicy::from_secs(None), RetentionPolicy::KeepForever);
        assert_eq!(
            RetentionPolicy::from_secs(Some(60)).max_age(),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_sweep_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("generation");
        assert_eq!(sweep(&root, Duration::ZERO, SystemTime::now()), 0);
    }

    #[test]
    fn test_sweep_removes_only_expired_runs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("aaaa0000/animation")).unwrap();
        fs::create_dir_all(root.join("bbbb1111/animation")).unwrap();
        fs::create_dir_all(root.join("not-a-run")).unwrap();
        fs::write(root.join("cccc2222"), b"stray file").unwrap();

        // Everything is idle an hour from now
        let later = SystemTime::now() + HOUR;
        assert_eq!(sweep(root, Duration::from_secs(60), later), 2);

        assert!(!root.join("aaaa0000").exists());
        assert!(!root.join("bbbb1111").exists());
        assert!(root.join("not-a-run").exists());
        assert!(root.join("cccc2222").exists());
    }

    #[test]
    fn test_sweep_keeps_fresh_runs() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("aaaa0000/animation")).unwrap();

        assert_eq!(sweep(temp_dir.path(), HOUR, SystemTime::now()), 0);
        assert!(temp_dir.path().join("aaaa0000").exists());
    }

    #[test]
    fn test_recent_video_keeps_old_run_dir() {
        let temp_dir = TempDir::new().unwrap();
        let run_dir = temp_dir.path().join("aaaa0000");
        let animation = run_dir.join("animation");
        fs::create_dir_all(&animation).unwrap();
        let video = animation.join("out.mp4");
        fs::write(&video, b"video").unwrap();

        let now = SystemTime::now();
        backdate(&run_dir, now - 2 * HOUR);
        backdate(&animation, now - 2 * HOUR);

        assert_eq!(sweep(temp_dir.path(), HOUR, now), 0);
        assert!(video.exists());

        backdate(&video, now - 2 * HOUR);
        assert_eq!(sweep(temp_dir.path(), HOUR, now), 1);
        assert!(!run_dir.exists());
    }

    #[test]
    fn test_active_runs_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("aaaa0000/animation")).unwrap();
        fs::create_dir_all(temp_dir.path().join("bbbb1111/animation")).unwrap();

        let active: HashSet<RunId> = ["aaaa0000".parse().unwrap()].into_iter().collect();
        let later = SystemTime::now() + HOUR;
        let removed =
            sweep_expired(temp_dir.path(), Duration::from_secs(60), later, &active).unwrap();

        assert_eq!(removed, 1);
        assert!(temp_dir.path().join("aaaa0000").exists());
        assert!(!temp_dir.path().join("bbbb1111").exists());
    }
}
