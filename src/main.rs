#![forbid(unsafe_code)]

use simstart::{cli::Input, util::cli::exec};

fn main() {
    exec::<Input>()
}
