/// Compute device handed to the generation script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Gpu(u32),
    Cpu,
}

impl Device {
    /// Resolve the device from the process-wide GPU toggle
    pub fn from_flag(use_gpu: bool, gpu_id: u32) -> Self {
        if use_gpu {
            Self::Gpu(gpu_id)
        } else {
            Self::Cpu
        }
    }

    /// Value passed to `--gpu_id`. The script treats `-1` as CPU.
    pub fn selector(&self) -> String {
        match self {
            Self::Gpu(index) => index.to_string(),
            Self::Cpu => "-1".to_string(),
        }
    }

    /// Name for logs and the UI
    pub fn name(&self) -> String {
        match self {
            Self::Gpu(index) => format!("cuda:{index}"),
            Self::Cpu => "cpu".to_string(),
        }
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self, Self::Gpu(_))
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::Gpu(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        assert_eq!(Device::Gpu(0).selector(), "0");
        assert_eq!(Device::Gpu(3).selector(), "3");
        assert_eq!(Device::Cpu.selector(), "-1");
    }

    #[test]
    fn test_from_flag() {
        assert_eq!(Device::from_flag(true, 0), Device::Gpu(0));
        assert_eq!(Device::from_flag(false, 2), Device::Cpu);
        assert!(!Device::Cpu.is_gpu());
    }
}
