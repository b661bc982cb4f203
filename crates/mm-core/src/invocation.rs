use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use crate::device::Device;
use crate::run_id::RunId;

/// Fully built command line for one run of the generation script.
///
/// Arguments are kept as discrete tokens and handed to the OS directly, so
/// the prompt never passes through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(
        program: impl AsRef<OsStr>,
        script: &Path,
        device: Device,
        run_id: &RunId,
        prompt: &str,
    ) -> Self {
        let args = vec![
            script.as_os_str().to_owned(),
            "--gpu_id".into(),
            device.selector().into(),
            "--ext".into(),
            run_id.as_str().into(),
            "--text_prompt".into(),
            prompt.into(),
        ];

        Self {
            program: program.as_ref().to_owned(),
            args,
            working_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg_strs(inv: &Invocation) -> Vec<&str> {
        inv.args().iter().map(|a| a.to_str().unwrap()).collect()
    }

    #[test]
    fn test_gpu_invocation() {
        let run_id: RunId = "1a2b3c4d".parse().unwrap();
        let inv = Invocation::new(
            "python",
            Path::new("gen_t2m.py"),
            Device::Gpu(0),
            &run_id,
            "A person is walking forward.",
        );

        assert_eq!(inv.program(), "python");
        assert_eq!(
            arg_strs(&inv),
            vec![
                "gen_t2m.py",
                "--gpu_id",
                "0",
                "--ext",
                "1a2b3c4d",
                "--text_prompt",
                "A person is walking forward.",
            ]
        );
        assert!(inv.working_dir().is_none());
    }

    #[test]
    fn test_cpu_selector() {
        let run_id: RunId = "deadbeef".parse().unwrap();
        let inv = Invocation::new("python", Path::new("gen_t2m.py"), Device::Cpu, &run_id, "jump");
        assert_eq!(arg_strs(&inv)[2], "-1");
    }

    #[test]
    fn test_prompt_is_single_untouched_token() {
        let run_id: RunId = "00ff00ff".parse().unwrap();
        let prompts = [
            "  leading and trailing spaces  ",
            "a \"quoted\" 'kick'",
            "$(rm -rf /); `whoami` && echo $HOME",
            "multi\nline",
            "--gpu_id 3",
        ];

        for prompt in prompts {
            let script = Path::new("gen_t2m.py");
            let inv = Invocation::new("python", script, Device::Gpu(0), &run_id, prompt);
            assert_eq!(inv.args().len(), 7);
            assert_eq!(inv.args()[6].to_str().unwrap(), prompt);
        }
    }

    #[test]
    fn test_command_carries_working_dir() {
        let run_id: RunId = "00ff00ff".parse().unwrap();
        let script = Path::new("gen_t2m.py");
        let inv = Invocation::new("python", script, Device::Gpu(1), &run_id, "wave")
            .in_dir(Some(PathBuf::from("/srv/momask")));

        let cmd = inv.to_command();
        assert_eq!(cmd.get_program(), "python");
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/srv/momask")));
        assert_eq!(cmd.get_args().count(), 7);
    }
}
