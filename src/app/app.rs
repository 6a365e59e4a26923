// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::convert::TryFrom;
use std::env;

use clap::ArgMatches;
use tracing::{debug, error, info};

use crate::app::cli_parser::create_parser;
use crate::app::logging::Logging;
use crate::app::modules::{self, PartialError};
use crate::app::output::styles::{self, ERROR_PREFIX};
use crate::app::{AppConfig, ExitStatus};

pub async fn run() -> ExitStatus {
    let args = match create_parser().try_get_matches() {
        Ok(args) => args,
        Err(err) => {
            // Help and version requests end up here, too.
            let _ = err.print();
            return if err.use_stderr() {
                ExitStatus::CliParsingFailed
            } else {
                ExitStatus::Ok
            };
        }
    };

    setup_terminal(&args);

    let color = !args.get_flag("no-color");
    let debug = args.get_flag("debug");
    if let Err(err) = Logging::new(args.get_count("v"), env::var_os("RUST_LOG"), color, debug).start() {
        eprintln!("{} Failed to set up logging: {:#}", &*ERROR_PREFIX, err);
        return ExitStatus::UnrecoverableError;
    }
    debug!("Parsed args and set up logging.");

    let app_config = match AppConfig::try_from(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to parse configuration: {:#}", err);
            eprintln!("{} Failed to parse configuration: {:#}", &*ERROR_PREFIX, err);
            return ExitStatus::ConfigParsingFailed;
        }
    };
    debug!("Parsed app configuration.");

    let res = modules::check::run(&app_config).await;
    info!("Finished run.");

    match res {
        Ok(exit_status) => exit_status,
        Err(PartialError::Failed(exit_status)) => exit_status,
        Err(PartialError::Err(err)) => {
            error!("Run failed: {:#}", err);
            eprintln!("{} Run failed: {:#}", &*ERROR_PREFIX, err);
            ExitStatus::Failed
        }
    }
}

fn setup_terminal(args: &ArgMatches) {
    if args.get_flag("ascii") {
        styles::ascii_mode();
    }
    if args.get_flag("no-color") {
        styles::no_color_mode();
    }
}
