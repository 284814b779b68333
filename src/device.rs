use crate::{
    env::Env,
    opts,
    simctl::{self, Device, DeviceListError},
    util::{
        cli::{Report, Reportable, TextWrapper},
        prompt,
    },
};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error(transparent)]
    DetectionFailed(DeviceListError),
    #[error("No iOS simulators detected")]
    NoneDetected,
    #[error("Simulator selection requires an interactive console")]
    NonInteractive,
    #[error("Failed to prompt for simulator: {0}")]
    PromptFailed(io::Error),
}

impl Reportable for PromptError {
    fn report(&self) -> Report {
        match self {
            Self::DetectionFailed(err) => err.report(),
            Self::NoneDetected => Report::error(
                "Failed to prompt for simulator",
                "No iOS simulators detected; install one via Xcode and try again",
            ),
            Self::NonInteractive => Report::error(
                "Failed to prompt for simulator",
                "Simulator selection requires an interactive console, but the current session is non-interactive",
            ),
            Self::PromptFailed(err) => Report::error("Failed to prompt for simulator", err),
        }
    }
}

pub fn simulator_prompt(
    env: &Env,
    interactivity: opts::Interactivity,
    wrapper: &TextWrapper,
) -> Result<Device, PromptError> {
    Report::step("Retrieving all iOS simulators").print(wrapper);
    let device_list = simctl::device_list(env).map_err(PromptError::DetectionFailed)?;
    Report::step("All iOS simulators retrieved").print(wrapper);
    log::info!("detected {} iOS simulators", device_list.len());
    if device_list.is_empty() {
        return Err(PromptError::NoneDetected);
    }
    if interactivity.none() {
        return Err(PromptError::NonInteractive);
    }
    let index = if device_list.len() > 1 {
        prompt::list(
            "Detected iOS simulators",
            device_list.iter(),
            "simulator",
            None,
            "Simulator",
        )
        .map_err(PromptError::PromptFailed)?
    } else {
        0
    };
    let device = device_list.into_iter().nth(index).unwrap();
    println!("Selected simulator: {}", device);
    Ok(device)
}
