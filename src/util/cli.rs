use crate::opts;
use colored::{Color, Colorize as _};
use std::{
    fmt::{Debug, Display},
    io::{self, Write as _},
};
use structopt::{
    clap::{self, AppSettings},
    StructOpt,
};

pub static GLOBAL_SETTINGS: &[AppSettings] = &[
    AppSettings::ColoredHelp,
    AppSettings::DeriveDisplayOrder,
    AppSettings::VersionlessSubcommands,
];

pub static VERSION_SHORT: &str = concat!("v", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Copy, Debug, StructOpt)]
pub struct GlobalFlags {
    #[structopt(
        short = "v",
        long = "verbose",
        help = "Vomit out extensive logging (-vv for more)",
        global = true,
        multiple = true,
        parse(from_occurrences = opts::NoiseLevel::from_occurrences),
    )]
    pub noise_level: opts::NoiseLevel,
    #[structopt(
        short = "y",
        long = "non-interactive",
        help = "Never prompt for input",
        global = true,
        parse(from_flag = opts::Interactivity::from_flag),
    )]
    pub interactivity: opts::Interactivity,
}

pub type TextWrapper = textwrap::Wrapper<'static, textwrap::NoHyphenation>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Label {
    Notify,
    Step,
    Warning,
    Error,
}

impl Label {
    pub fn color(self) -> Color {
        match self {
            Self::Notify => Color::Cyan,
            Self::Step => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::BrightRed,
        }
    }

    pub fn exit_code(self) -> i8 {
        match self {
            Self::Error => 1,
            _ => 0,
        }
    }
}

#[derive(Debug)]
pub struct Report {
    pub label: Label,
    msg: String,
    details: Option<String>,
}

impl Report {
    pub fn new(label: Label, msg: impl Display) -> Self {
        Self {
            label,
            msg: msg.to_string(),
            details: None,
        }
    }

    pub fn notify(msg: impl Display) -> Self {
        Self::new(Label::Notify, msg)
    }

    pub fn step(msg: impl Display) -> Self {
        Self::new(Label::Step, msg)
    }

    pub fn warning(msg: impl Display) -> Self {
        Self::new(Label::Warning, msg)
    }

    pub fn error(msg: impl Display, details: impl Display) -> Self {
        Self {
            label: Label::Error,
            msg: msg.to_string(),
            details: Some(details.to_string()),
        }
    }

    fn render(&self, wrapper: &TextWrapper) -> String {
        let head = self.msg.color(self.label.color()).bold();
        match self.details.as_ref() {
            Some(details) => format!("{}\n{}", head, wrapper.fill(details)),
            None => head.to_string(),
        }
    }

    // Printing is best-effort; write failures are discarded.
    pub fn print(&self, wrapper: &TextWrapper) {
        let text = self.render(wrapper);
        if let Label::Error = self.label {
            let _ = writeln!(io::stderr(), "{}", text);
        } else {
            let _ = writeln!(io::stdout(), "{}", text);
        }
    }
}

pub trait Reportable: Debug {
    fn report(&self) -> Report;
}

pub trait Exec: Debug + StructOpt {
    type Report: Reportable;

    fn global_flags(&self) -> GlobalFlags;

    fn exec(self, wrapper: &TextWrapper) -> Result<(), Self::Report>;
}

fn init_logging(noise_level: opts::NoiseLevel) {
    use env_logger::{Builder, Env};
    let default_level = match noise_level {
        opts::NoiseLevel::Polite => "warn",
        opts::NoiseLevel::LoudAndProud => "simstart=info",
        opts::NoiseLevel::FranklyQuitePedantic => "info,simstart=debug",
    };
    let env = Env::default().default_filter_or(default_level);
    Builder::from_env(env).init();
}

#[derive(Debug)]
pub enum Exit {
    Report(Report),
    Clap(clap::Error),
}

impl Exit {
    fn report(reportable: impl Reportable) -> Self {
        log::info!("exiting with {:#?}", reportable);
        Self::Report(reportable.report())
    }

    fn do_the_thing(self, wrapper: TextWrapper) -> ! {
        match self {
            Self::Report(report) => {
                report.print(&wrapper);
                // We only expose access to the 8 lsb of the exit code, since:
                // https://doc.rust-lang.org/std/process/fn.exit.html#platform-specific-behavior
                std::process::exit(report.label.exit_code().into())
            }
            Self::Clap(err) => err.exit(),
        }
    }

    pub fn main(inner: impl FnOnce(&TextWrapper) -> Result<(), Self>) {
        let wrapper = TextWrapper::with_splitter(textwrap::termwidth(), textwrap::NoHyphenation);
        if let Err(exit) = inner(&wrapper) {
            exit.do_the_thing(wrapper)
        }
    }
}

pub fn exec<E: Exec>() {
    Exit::main(|wrapper| {
        let input = E::from_iter_safe(std::env::args()).map_err(Exit::Clap)?;
        init_logging(input.global_flags().noise_level);
        input.exec(wrapper).map_err(Exit::report)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest(label, code,
        case(Label::Notify, 0),
        case(Label::Step, 0),
        case(Label::Warning, 0),
        case(Label::Error, 1)
    )]
    fn test_exit_code(label: Label, code: i8) {
        assert_eq!(label.exit_code(), code);
    }
}
