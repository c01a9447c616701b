//! List available audio input devices.

use crate::capture::{list_input_devices, InputDeviceInfo};

/// Prints every input device with the ID to use in `siriwave.toml` or `--device`.
///
/// # Errors
/// - If the audio host cannot enumerate devices
pub fn handle_list_devices() -> anyhow::Result<()> {
    let devices = list_input_devices()?;

    if devices.is_empty() {
        println!("No audio input devices found on this system.");
        return Ok(());
    }

    println!();
    println!("Available audio input devices:");
    println!();
    for device in &devices {
        println!("{}", describe_device(device));
    }

    Ok(())
}

fn describe_device(device: &InputDeviceInfo) -> String {
    let default_indicator = if device.is_default { " [DEFAULT]" } else { "" };
    let config_info = match device.config {
        Some((sample_rate, channels)) => format!("{sample_rate}Hz, {channels} channels"),
        None => "configuration unavailable".to_string(),
    };

    format!(
        "  ID: {}\n    Name: {}{}\n    Config: {}\n",
        device.index, device.name, default_indicator, config_info
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_default_device() {
        let device = InputDeviceInfo {
            index: 0,
            name: "USB Mic".to_string(),
            is_default: true,
            config: Some((48_000, 2)),
        };
        assert_eq!(
            describe_device(&device),
            "  ID: 0\n    Name: USB Mic [DEFAULT]\n    Config: 48000Hz, 2 channels\n"
        );
    }

    #[test]
    fn test_describe_unreadable_config() {
        let device = InputDeviceInfo {
            index: 3,
            name: "hw:1".to_string(),
            is_default: false,
            config: None,
        };
        assert!(describe_device(&device).contains("Config: configuration unavailable"));
    }
}
