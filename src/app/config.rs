// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::convert::TryFrom;

use anyhow::Context;
use clap::ArgMatches;

#[derive(Debug)]
pub struct AppConfig {
    pub servers_file_path: String,
    pub hostnames_file_path: String,
    pub output_file_path: String,
    pub accept_invalid_certs: bool,
    pub quiet: bool,
}

impl TryFrom<&ArgMatches> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: &ArgMatches) -> std::result::Result<Self, Self::Error> {
        let config = AppConfig {
            servers_file_path: args
                .get_one::<String>("servers")
                .context("No servers file specified")?
                .to_string(),
            hostnames_file_path: args
                .get_one::<String>("hostnames")
                .context("No host names file specified")?
                .to_string(),
            output_file_path: args
                .get_one::<String>("output-file")
                .context("No output file specified")?
                .to_string(),
            accept_invalid_certs: args.get_flag("insecure"),
            quiet: args.get_flag("quiet"),
        };

        Ok(config)
    }
}
