use std::path::PathBuf;
use anyhow::{anyhow, Context};
use crate::device::Device;

/// Settings fixed at startup and handed to the coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub use_gpu: bool,
    pub gpu_id: u32,
    /// Program that runs the generation script
    pub interpreter: String,
    pub script: PathBuf,
    /// Working directory of the external process, if not our own
    pub working_dir: Option<PathBuf>,
    pub output_root: PathBuf,
    pub animation_dir: String,
    pub video_extension: String,
    /// Hold the device gate for the whole external run
    pub serialize_runs: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            use_gpu: true,
            gpu_id: 0,
            interpreter: "python".to_string(),
            script: PathBuf::from("gen_t2m.py"),
            working_dir: None,
            output_root: PathBuf::from("generation"),
            animation_dir: "animation".to_string(),
            video_extension: "mp4".to_string(),
            serialize_runs: true,
        }
    }
}

impl CoordinatorConfig {
    /// Read `MM_*` variables through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut conf = Self::default();

        if let Some(value) = lookup("MM_USE_GPU") {
            conf.use_gpu = parse_bool(&value).context("MM_USE_GPU")?;
        }
        if let Some(value) = lookup("MM_GPU_ID") {
            conf.gpu_id = value
                .trim()
                .parse()
                .with_context(|| format!("MM_GPU_ID must be a GPU index, got {value:?}"))?;
        }
        if let Some(value) = lookup("MM_PYTHON") {
            conf.interpreter = value;
        }
        if let Some(value) = lookup("MM_SCRIPT") {
            conf.script = PathBuf::from(value);
        }
        if let Some(value) = lookup("MM_WORKDIR") {
            conf.working_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("MM_OUTPUT_ROOT") {
            conf.output_root = PathBuf::from(value);
        }
        if let Some(value) = lookup("MM_VIDEO_EXT") {
            let ext = value.trim().trim_start_matches('.').to_string();
            if ext.is_empty() {
                return Err(anyhow!("MM_VIDEO_EXT must not be empty"));
            }
            conf.video_extension = ext;
        }
        if let Some(value) = lookup("MM_SERIALIZE_RUNS") {
            conf.serialize_runs = parse_bool(&value).context("MM_SERIALIZE_RUNS")?;
        }

        Ok(conf)
    }

    pub fn device(&self) -> Device {
        Device::from_flag(self.use_gpu, self.gpu_id)
    }

    /// Base directory of all runs, as seen from this process
    pub fn resolved_output_root(&self) -> PathBuf {
        match &self.working_dir {
            Some(dir) if self.output_root.is_relative() => dir.join(&self.output_root),
            _ => self.output_root.clone(),
        }
    }
}

pub fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean, got {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let conf = CoordinatorConfig::from_lookup(|_| None).unwrap();
        assert!(conf.use_gpu);
        assert_eq!(conf.device(), Device::Gpu(0));
        assert_eq!(conf.interpreter, "python");
        assert_eq!(conf.script, PathBuf::from("gen_t2m.py"));
        assert_eq!(conf.resolved_output_root(), PathBuf::from("generation"));
        assert!(conf.serialize_runs);
    }

    #[test]
    fn test_overrides() {
        let conf = CoordinatorConfig::from_lookup(lookup_from(&[
            ("MM_USE_GPU", "off"),
            ("MM_PYTHON", "python3"),
            ("MM_WORKDIR", "/srv/momask"),
            ("MM_VIDEO_EXT", ".webm"),
            ("MM_SERIALIZE_RUNS", "no"),
        ]))
        .unwrap();
        assert_eq!(conf.device(), Device::Cpu);
        assert_eq!(conf.interpreter, "python3");
        assert_eq!(conf.video_extension, "webm");
        assert_eq!(conf.resolved_output_root(), PathBuf::from("/srv/momask/generation"));
        assert!(!conf.serialize_runs);
    }

    #[test]
    fn test_absolute_output_root_ignores_workdir() {
        let conf = CoordinatorConfig::from_lookup(lookup_from(&[
            ("MM_WORKDIR", "/srv/momask"),
            ("MM_OUTPUT_ROOT", "/data/runs"),
        ]))
        .unwrap();
        assert_eq!(conf.resolved_output_root(), PathBuf::from("/data/runs"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(CoordinatorConfig::from_lookup(lookup_from(&[("MM_USE_GPU", "maybe")])).is_err());
        assert!(CoordinatorConfig::from_lookup(lookup_from(&[("MM_GPU_ID", "first")])).is_err());
        assert!(CoordinatorConfig::from_lookup(lookup_from(&[("MM_VIDEO_EXT", " ")])).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(" TRUE ").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("Off").unwrap());
        assert!(parse_bool("").is_err());
    }
}
