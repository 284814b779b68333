use crate::{
    device::{self, PromptError},
    env::{Env, Error as EnvError},
    simctl::{self, DeviceListError, LaunchError},
    util::{
        cli::{self, Exec, GlobalFlags, Report, Reportable, TextWrapper, VERSION_SHORT},
        prompt,
    },
    NAME,
};
use structopt::StructOpt;

static BANNER: &str =
    "============================  iOS Simulator Helper  ============================";

#[derive(Debug, StructOpt)]
#[structopt(
    bin_name = NAME,
    about = "Boots the iOS simulator of your choice and brings it to the front",
    version = VERSION_SHORT,
    global_settings = cli::GLOBAL_SETTINGS,
)]
pub struct Input {
    #[structopt(flatten)]
    flags: GlobalFlags,
    #[structopt(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(
        name = "run",
        about = "Pick a simulator, boot it, and bring it to the front"
    )]
    Run,
    #[structopt(name = "list", about = "Lists detected iOS simulators")]
    List,
}

#[derive(Debug)]
pub enum Error {
    EnvInitFailed(EnvError),
    SimulatorPromptFailed(PromptError),
    LaunchFailed(LaunchError),
    ListFailed(DeviceListError),
}

impl Reportable for Error {
    fn report(&self) -> Report {
        match self {
            Self::EnvInitFailed(err) => err.report(),
            Self::SimulatorPromptFailed(err) => err.report(),
            Self::LaunchFailed(err) => err.report(),
            Self::ListFailed(err) => err.report(),
        }
    }
}

impl Exec for Input {
    type Report = Error;

    fn global_flags(&self) -> GlobalFlags {
        self.flags
    }

    fn exec(self, wrapper: &TextWrapper) -> Result<(), Self::Report> {
        let Self {
            flags: GlobalFlags { interactivity, .. },
            command,
        } = self;
        let env = Env::new().map_err(Error::EnvInitFailed)?;
        // Running with no subcommand at all gives you the whole interactive
        // flow, which is the entire point of this tool.
        match command.unwrap_or(Command::Run) {
            Command::Run => {
                Report::notify(BANNER).print(wrapper);
                let device = device::simulator_prompt(&env, interactivity, wrapper)
                    .map_err(Error::SimulatorPromptFailed)?;
                simctl::launch(&device, &env, wrapper).map_err(Error::LaunchFailed)?;
                Report::notify(BANNER).print(wrapper);
                Ok(())
            }
            Command::List => simctl::device_list(&env)
                .map_err(Error::ListFailed)
                .map(|device_list| {
                    prompt::list_display_only(device_list.iter(), device_list.len());
                }),
        }
    }
}
