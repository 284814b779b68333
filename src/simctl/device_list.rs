use super::{Device, DeviceState};
use crate::{
    env::{Env, ExplicitEnv as _},
    util::cli::{Report, Reportable},
    DuctExpressionExt,
};
use once_cell_regex::regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceListError {
    #[error("Failed to request device list from `simctl`: {0}")]
    DetectionFailed(#[from] std::io::Error),
    #[error("`simctl list` returned invalid JSON: {0}")]
    InvalidDeviceList(#[from] serde_json::Error),
}

impl Reportable for DeviceListError {
    fn report(&self) -> Report {
        Report::error("Failed to detect iOS simulators", self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDevice {
    name: String,
    udid: String,
    state: String,
    availability: Option<String>,
    is_available: Option<bool>,
}

impl RawDevice {
    // Old `simctl` annotates with a parenthesized string; new `simctl`
    // reports a bool instead.
    fn annotation(&self) -> Option<String> {
        if let Some(availability) = self.availability.as_ref() {
            return regex!(r"\((.*)\)")
                .captures(availability)
                .map(|caps| caps[1].to_owned());
        }
        self.is_available.map(|available| {
            if available {
                "available".to_owned()
            } else {
                "unavailable".to_owned()
            }
        })
    }
}

#[derive(Deserialize)]
struct DeviceListOutput {
    devices: HashMap<String, Vec<RawDevice>>,
}

/// Extracts the OS version fragment from a runtime group label. Handles both
/// label formats emitted by `simctl` over the years: human-readable
/// (`"iOS 17.0"`) and runtime identifier
/// (`"com.apple.CoreSimulator.SimRuntime.iOS-17-0"`).
fn runtime_version(group: &str) -> Option<String> {
    if group.contains(' ') {
        return group.split_whitespace().nth(1).map(ToOwned::to_owned);
    }
    let tail = group.rsplit('.').next().unwrap_or(group);
    let mut fragments = tail.split('-');
    fragments.next();
    let version = fragments.collect::<Vec<_>>().join(".");
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}

impl Device {
    fn from_raw(raw: RawDevice, group: &str) -> Self {
        let availability = raw.annotation();
        let state = DeviceState::from_raw(&raw.state);
        match runtime_version(group) {
            Some(version) => Self {
                name: format!("{} {}", raw.name, version),
                udid: raw.udid,
                version,
                state,
                availability,
            },
            None => Self {
                name: raw.name,
                udid: raw.udid,
                version: group.to_owned(),
                state,
                availability,
            },
        }
    }
}

fn parse_device_list(stdout: &str) -> Result<BTreeSet<Device>, DeviceListError> {
    let devices = serde_json::from_str::<DeviceListOutput>(stdout)?
        .devices
        .into_iter()
        .filter(|(group, _)| group.contains("iOS"))
        .flat_map(|(group, raw_devices)| {
            raw_devices
                .into_iter()
                .map(|raw| Device::from_raw(raw, &group))
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(devices)
}

pub fn device_list(env: &Env) -> Result<BTreeSet<Device>, DeviceListError> {
    let result = duct::cmd("xcrun", ["simctl", "list", "--json", "devices"])
        .vars(env.explicit_env())
        .stdout_capture()
        .stderr_capture()
        .run();
    match result {
        Ok(output) => {
            if output.stdout.is_empty() && output.stderr.is_empty() {
                log::info!("`simctl list` returned an empty response; interpreting as a successful run with no simulators present");
                Ok(Default::default())
            } else {
                parse_device_list(&String::from_utf8_lossy(&output.stdout))
            }
        }
        Err(err) => Err(DeviceListError::DetectionFailed(err)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    static LEGACY_LIST: &str = r#"{
        "devices": {
            "iOS 17.0": [
                {
                    "name": "iPhone 15",
                    "state": "Shutdown",
                    "udid": "ABC-123",
                    "availability": "(available)"
                }
            ],
            "watchOS 10.0": [
                {
                    "name": "Apple Watch Series 9",
                    "state": "Shutdown",
                    "udid": "WATCH-1",
                    "availability": "(available)"
                }
            ]
        }
    }"#;

    static MODERN_LIST: &str = r#"{
        "devices": {
            "com.apple.CoreSimulator.SimRuntime.iOS-16-4": [
                {
                    "name": "iPhone 14",
                    "state": "Booted",
                    "udid": "DEF-456",
                    "isAvailable": true,
                    "deviceTypeIdentifier": "com.apple.CoreSimulator.SimDeviceType.iPhone-14"
                },
                {
                    "name": "iPad Pro (11-inch)",
                    "state": "Shutdown",
                    "udid": "GHI-789",
                    "isAvailable": false,
                    "deviceTypeIdentifier": "com.apple.CoreSimulator.SimDeviceType.iPad-Pro-11"
                }
            ],
            "com.apple.CoreSimulator.SimRuntime.tvOS-16-4": [
                {
                    "name": "Apple TV 4K",
                    "state": "Shutdown",
                    "udid": "TV-1",
                    "isAvailable": true
                }
            ]
        }
    }"#;

    #[rstest(group, version,
        case("iOS 17.0", Some("17.0")),
        case("iOS 9.3", Some("9.3")),
        case("com.apple.CoreSimulator.SimRuntime.iOS-17-0", Some("17.0")),
        case("com.apple.CoreSimulator.SimRuntime.iOS-16-4", Some("16.4")),
        case("iOS", None)
    )]
    fn test_runtime_version(group: &str, version: Option<&str>) {
        assert_eq!(runtime_version(group).as_deref(), version);
    }

    #[test]
    fn test_parse_retains_only_ios_groups() {
        let devices = parse_device_list(LEGACY_LIST).unwrap();
        assert_eq!(devices.len(), 1);
        let device = devices.iter().next().unwrap();
        assert_eq!(device.name(), "iPhone 15 17.0");
        assert_eq!(device.version(), "17.0");
        assert_eq!(device.udid(), "ABC-123");
        assert_eq!(device.state(), &DeviceState::Shutdown);
        assert_eq!(device.availability(), Some("available"));
    }

    #[test]
    fn test_parse_modern_runtime_labels() {
        let devices = parse_device_list(MODERN_LIST).unwrap();
        assert_eq!(devices.len(), 2);
        let mut devices = devices.into_iter();
        let ipad = devices.next().unwrap();
        assert_eq!(ipad.name(), "iPad Pro (11-inch) 16.4");
        assert_eq!(ipad.availability(), Some("unavailable"));
        let iphone = devices.next().unwrap();
        assert_eq!(iphone.name(), "iPhone 14 16.4");
        assert_eq!(iphone.version(), "16.4");
        assert_eq!(iphone.state(), &DeviceState::Booted);
        assert_eq!(iphone.availability(), Some("available"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(
            parse_device_list(LEGACY_LIST).unwrap(),
            parse_device_list(LEGACY_LIST).unwrap()
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = parse_device_list("simctl exploded");
        assert!(matches!(
            result,
            Err(DeviceListError::InvalidDeviceList(_))
        ));
    }

    #[test]
    fn test_no_ios_groups_is_empty_not_an_error() {
        let devices =
            parse_device_list(r#"{"devices": {"watchOS 10.0": []}}"#).unwrap();
        assert!(devices.is_empty());
    }
}
