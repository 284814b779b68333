use crate::{
    env::{Env, ExplicitEnv as _},
    DuctExpressionExt,
};
use std::{
    fmt::{self, Display},
    io,
};

mod device_list;
mod launch;

pub use device_list::{device_list, DeviceListError};
pub use launch::{launch, sequence, LaunchError, Step};

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum DeviceState {
    Booted,
    Shutdown,
    Other(String),
}

impl DeviceState {
    fn from_raw(raw: &str) -> Self {
        match raw {
            "Booted" => Self::Booted,
            "Shutdown" => Self::Shutdown,
            _ => Self::Other(raw.to_owned()),
        }
    }

    pub fn booted(&self) -> bool {
        matches!(self, Self::Booted)
    }
}

/// One simulator known to `simctl`, with its name and version already
/// normalized from the runtime group it was listed under.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Device {
    name: String,
    udid: String,
    version: String,
    state: DeviceState,
    availability: Option<String>,
}

impl Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Device {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn udid(&self) -> &str {
        &self.udid
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn availability(&self) -> Option<&str> {
        self.availability.as_deref()
    }

    fn simctl_command(&self, env: &Env, subcommand: &str) -> duct::Expression {
        duct::cmd("xcrun", ["simctl", subcommand, self.udid.as_str()]).vars(env.explicit_env())
    }

    pub fn shutdown(&self, env: &Env) -> io::Result<()> {
        self.simctl_command(env, "shutdown").run().map(|_| ())
    }

    pub fn boot(&self, env: &Env) -> io::Result<()> {
        self.simctl_command(env, "boot").run().map(|_| ())
    }

    pub fn start(&self, env: &Env) -> io::Result<()> {
        duct::cmd(
            "open",
            [
                "-a",
                "Simulator",
                "--args",
                "-CurrentDeviceUDID",
                self.udid.as_str(),
            ],
        )
        .vars(env.explicit_env())
        .run()
        .map(|_| ())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest(raw, state,
        case("Booted", DeviceState::Booted),
        case("Shutdown", DeviceState::Shutdown),
        case("Creating", DeviceState::Other("Creating".to_owned()))
    )]
    fn test_state_from_raw(raw: &str, state: DeviceState) {
        assert_eq!(DeviceState::from_raw(raw), state);
    }
}
