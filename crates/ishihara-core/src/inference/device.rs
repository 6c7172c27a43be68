//! Device selection for inference.

use candle_core::Device;
use tracing::info;

/// Returns the best available device for digit inference.
///
/// GPU backends are only tried when the crate is built with the `metal`
/// or `cuda` feature. Falls back to CPU.
#[must_use]
pub fn get_device() -> Device {
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal device for inference");
                return device;
            }
            Err(e) => tracing::debug!("Metal unavailable: {e}"),
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA device for inference");
                return device;
            }
            Err(e) => tracing::debug!("CUDA unavailable: {e}"),
        }
    }

    info!("Using CPU for inference");
    Device::Cpu
}

/// Short human-readable name of a device.
#[must_use]
pub const fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_label() {
        assert_eq!(device_label(&Device::Cpu), "cpu");
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    #[test]
    fn test_default_build_uses_cpu() {
        assert!(get_device().is_cpu());
    }
}
