//! Input device lookup shared by the level meter and `list-devices`.

use cpal::traits::{DeviceTrait, HostTrait};

use super::CaptureError;

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Summary of an input device for display.
#[derive(Debug, Clone)]
pub struct InputDeviceInfo {
    pub index: usize,
    pub name: String,
    pub is_default: bool,
    /// `(sample_rate, channels)` when the default input config is readable.
    pub config: Option<(u32, u16)>,
}

/// Resolves a device selector to a cpal input device.
///
/// `spec` is `"default"`, a numeric index, or an exact device name as shown by
/// `siriwave list-devices`.
///
/// # Errors
/// - If there is no default device, the index is out of range, or no
///   device has that name
pub fn resolve_input_device(host: &cpal::Host, spec: &str) -> Result<cpal::Device, CaptureError> {
    if spec == "default" {
        return host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice);
    }

    let devices: Vec<cpal::Device> = host
        .input_devices()
        .map_err(|e| CaptureError::Enumerate(e.to_string()))?
        .collect();

    if let Ok(index) = spec.parse::<usize>() {
        let available = devices.len();
        return devices
            .into_iter()
            .nth(index)
            .ok_or(CaptureError::DeviceIndexOutOfRange { index, available });
    }

    devices
        .into_iter()
        .find(|device| device.name().is_ok_and(|name| name == spec))
        .ok_or_else(|| CaptureError::DeviceNotFound(spec.to_string()))
}

/// Enumerates every input device whose name can be queried.
///
/// # Errors
/// - If the host cannot enumerate devices
pub fn list_input_devices() -> Result<Vec<InputDeviceInfo>, CaptureError> {
    suppress_alsa_warnings(|| {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        let devices = host
            .input_devices()
            .map_err(|e| CaptureError::Enumerate(e.to_string()))?
            .filter_map(|device| device.name().ok().map(|name| (device, name)))
            .enumerate()
            .map(|(index, (device, name))| InputDeviceInfo {
                index,
                is_default: default_name.as_deref() == Some(name.as_str()),
                config: device
                    .default_input_config()
                    .ok()
                    .map(|c| (c.sample_rate().0, c.channels())),
                name,
            })
            .collect();

        Ok(devices)
    })
}

/// Runs `f` with stderr pointed at /dev/null so ALSA's probing noise does
/// not land on top of the terminal UI.
#[cfg(target_os = "linux")]
pub fn suppress_alsa_warnings<F, T>(f: F) -> Result<T, CaptureError>
where
    F: FnOnce() -> Result<T, CaptureError>,
{
    let dev_null = match OpenOptions::new().write(true).open("/dev/null") {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("Cannot open /dev/null, leaving stderr alone: {e}");
            return f();
        }
    };

    let saved_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if saved_stderr == -1 {
        return f();
    }

    if unsafe { libc::dup2(dev_null.as_raw_fd(), libc::STDERR_FILENO) } == -1 {
        unsafe { libc::close(saved_stderr) };
        return f();
    }

    let result = f();

    unsafe {
        libc::dup2(saved_stderr, libc::STDERR_FILENO);
        libc::close(saved_stderr);
    }

    result
}

#[cfg(not(target_os = "linux"))]
pub fn suppress_alsa_warnings<F, T>(f: F) -> Result<T, CaptureError>
where
    F: FnOnce() -> Result<T, CaptureError>,
{
    f()
}
