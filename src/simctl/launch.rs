use super::Device;
use crate::{
    env::Env,
    util::cli::{Report, Reportable, TextWrapper},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to shut down booted simulator: {0}")]
    ShutdownFailed(std::io::Error),
    #[error("Failed to boot simulator: {0}")]
    BootFailed(std::io::Error),
    #[error("Failed to open Simulator app: {0}")]
    OpenFailed(std::io::Error),
}

impl Reportable for LaunchError {
    fn report(&self) -> Report {
        match self {
            Self::ShutdownFailed(err) => Report::error("Failed to shut down booted simulator", err),
            Self::BootFailed(err) => Report::error("Failed to boot simulator", err),
            Self::OpenFailed(err) => {
                Report::error("Failed to bring the Simulator app to the foreground", err)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    Shutdown,
    Boot,
    Open,
}

/// The shutdown step only applies to a simulator that's already running;
/// boot and open always run, in that order.
pub fn sequence(device: &Device) -> Vec<Step> {
    let mut steps = Vec::with_capacity(3);
    if device.state().booted() {
        steps.push(Step::Shutdown);
    }
    steps.push(Step::Boot);
    steps.push(Step::Open);
    steps
}

pub fn launch(device: &Device, env: &Env, wrapper: &TextWrapper) -> Result<(), LaunchError> {
    for step in sequence(device) {
        match step {
            Step::Shutdown => {
                Report::warning(format!(
                    "{} is already booted. It will be shut down.",
                    device.name()
                ))
                .print(wrapper);
                device.shutdown(env).map_err(LaunchError::ShutdownFailed)?;
                Report::step(format!("{} has been shut down.", device.name())).print(wrapper);
            }
            Step::Boot => {
                device.boot(env).map_err(LaunchError::BootFailed)?;
                Report::step(format!("{} has been booted.", device.name())).print(wrapper);
            }
            Step::Open => {
                Report::step(format!("{} will be opened.", device.name())).print(wrapper);
                device.start(env).map_err(LaunchError::OpenFailed)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::simctl::DeviceState;
    use rstest::rstest;

    fn device(state: DeviceState) -> Device {
        Device {
            name: "iPhone 15 17.0".to_owned(),
            udid: "ABC-123".to_owned(),
            version: "17.0".to_owned(),
            state,
            availability: Some("available".to_owned()),
        }
    }

    #[rstest(state, steps,
        case(DeviceState::Booted, &[Step::Shutdown, Step::Boot, Step::Open]),
        case(DeviceState::Shutdown, &[Step::Boot, Step::Open]),
        case(DeviceState::Other("Creating".to_owned()), &[Step::Boot, Step::Open])
    )]
    fn test_sequence(state: DeviceState, steps: &[Step]) {
        assert_eq!(sequence(&device(state)), steps);
    }
}
