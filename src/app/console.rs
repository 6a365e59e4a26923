// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;
use std::io;
use std::time::Duration;

use yansi::Paint;

use crate::app::output::styles::{
    self, ATTENTION_PREFIX, CAPTION_PREFIX, ERROR_PREFIX, FINISHED_PREFIX, INFO_PREFIX, OK_PREFIX,
};
use crate::app::output::server_table;
use crate::app::AppConfig;
use crate::statistics::Statistics;
use crate::ResultSet;

#[derive(Debug, Default)]
pub struct ConsoleOpts {
    quiet: bool,
}

impl From<&AppConfig> for ConsoleOpts {
    fn from(app_config: &AppConfig) -> Self {
        ConsoleOpts {
            quiet: app_config.quiet,
        }
    }
}

#[derive(Debug)]
pub struct Console {
    opts: ConsoleOpts,
}

impl Console {
    pub fn new(opts: ConsoleOpts) -> Console {
        Console { opts }
    }

    pub fn print_check_estimates(&self, num_hostnames: usize, num_servers: usize) {
        if self.not_quiet() {
            self.info(format!(
                "Sending up to {} requests to {} for {}.",
                num_hostnames * num_servers + num_servers,
                plural(num_servers, "server", "servers"),
                plural(num_hostnames, "host name", "host names"),
            ));
        }
    }

    pub fn print_statistics(&self, result_set: &ResultSet, total_run_time: Duration) {
        if self.not_quiet() {
            let statistics = result_set.statistics();
            self.info(format!(
                "Received {} within {} ms of total run time.",
                statistics,
                total_run_time.as_millis()
            ));
        }
    }

    /// Reports every server, warning about servers which refused to authenticate.
    pub fn print_server_summary(&self, result_set: &ResultSet) -> anyhow::Result<()> {
        for check in result_set.servers().filter(|x| !x.is_authenticated()) {
            self.attention(format!(
                "Authentication at server '{}' ({}) failed; no hosts checked.",
                check.server_name(),
                check.url()
            ));
        }
        if self.not_quiet() {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            server_table(&mut handle, result_set)?;
        }

        Ok(())
    }

    pub fn print_finished(&self) {
        if self.not_quiet() {
            self.finished();
        }
    }

    pub fn emphasize<T: fmt::Display>(&self, item: T) {
        println!("{}", item.paint(styles::EMPH))
    }

    pub fn info<T: AsRef<str>>(&self, str: T) {
        println!("{} {}", &*INFO_PREFIX, str.as_ref());
    }

    pub fn attention<T: AsRef<str>>(&self, str: T) {
        println!("{} {}", ATTENTION_PREFIX.as_str().paint(styles::ATTENTION), str.as_ref());
    }

    pub fn finished(&self) {
        self.emphasize(format!("{} Finished.", &*FINISHED_PREFIX));
    }

    pub fn caption<T: AsRef<str>>(&self, str: T) {
        if self.not_quiet() {
            self.emphasize(format!("{} {}", &*CAPTION_PREFIX, str.as_ref()));
        }
    }

    pub fn error<T: AsRef<str>>(&self, str: T) {
        eprintln!("{} {}", ERROR_PREFIX.as_str().paint(styles::ERROR), str.as_ref());
    }

    pub fn ok<T: AsRef<str>>(&self, str: T) {
        if self.not_quiet() {
            println!("{} {}", OK_PREFIX.as_str().paint(styles::OK), str.as_ref());
        }
    }

    pub fn not_quiet(&self) -> bool {
        !self.opts.quiet
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}
