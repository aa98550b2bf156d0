// src/bin/cli.rs
use std::process::ExitCode;

use clap::Parser;
use paddock::{cli, log};

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    log::init(&args.log_level, args.log_file.as_deref())?;

    match cli::run(args) {
        Ok(code) => Ok(code),
        Err(e) => {
            paddock::loge!("{e}");
            Err(e.into())
        }
    }
}
