// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::time::Instant;

use anyhow::Context;
use tracing::{error, info};

use crate::app::modules::{Environment, PartialError, PartialResult};
use crate::app::{AppConfig, ExitStatus};
use crate::checker::{HostChecker, ResultSet};
use crate::hostnames;
use crate::report;
use crate::zabbix::{ServerConfigs, ZabbixClient, ZabbixClientOpts};

pub struct HostCheck {}

impl HostCheck {
    pub fn init(app_config: &AppConfig) -> PartialResult<LoadInputs<'_>> {
        let env = Environment::new(app_config);
        env.console.caption("Checking host names on Zabbix servers.");

        Ok(LoadInputs { env })
    }
}

pub struct LoadInputs<'a> {
    env: Environment<'a>,
}

impl<'a> LoadInputs<'a> {
    pub async fn load_inputs(self) -> PartialResult<CheckHosts<'a>> {
        let servers_file_path = &self.env.app_config.servers_file_path;
        let servers = match ServerConfigs::from_file(servers_file_path).await {
            Ok(servers) => servers,
            Err(err) => {
                error!("Failed to load servers from '{}': {:#}", servers_file_path, err);
                self.env
                    .console
                    .error(format!("Failed to load servers from '{}': {}", servers_file_path, err));
                return Err(PartialError::Failed(ExitStatus::ConfigParsingFailed));
            }
        };

        let hostnames_file_path = &self.env.app_config.hostnames_file_path;
        let hostnames = match hostnames::from_file(hostnames_file_path).await {
            Ok(hostnames) => hostnames,
            Err(err) => {
                error!("Failed to read host names from '{}': {:#}", hostnames_file_path, err);
                self.env
                    .console
                    .error(format!("Failed to read host names from '{}': {}", hostnames_file_path, err));
                return Err(PartialError::Failed(ExitStatus::ConfigParsingFailed));
            }
        };
        if hostnames.is_empty() {
            self.env
                .console
                .attention(format!("No host names found in '{}'.", hostnames_file_path));
        }

        Ok(CheckHosts {
            env: self.env,
            servers,
            hostnames,
        })
    }
}

pub struct CheckHosts<'a> {
    env: Environment<'a>,
    servers: ServerConfigs,
    hostnames: Vec<String>,
}

impl<'a> CheckHosts<'a> {
    pub async fn check_hosts(self) -> PartialResult<WriteReport<'a>> {
        let opts = ZabbixClientOpts::new(self.env.app_config.accept_invalid_certs);
        let client = ZabbixClient::new(opts).context("Failed to create Zabbix client")?;
        let checker = HostChecker::new(client);

        self.env
            .console
            .print_check_estimates(self.hostnames.len(), self.servers.len());

        info!("Running host checks.");
        let start_time = Instant::now();
        let result_set = checker
            .check_all(&self.hostnames, self.servers.as_slice())
            .await
            .context("Failed to check host names")?;
        let total_run_time = Instant::now() - start_time;
        info!("Finished host checks.");

        self.env.console.print_statistics(&result_set, total_run_time);
        self.env.console.print_server_summary(&result_set)?;

        Ok(WriteReport {
            env: self.env,
            result_set,
        })
    }
}

pub struct WriteReport<'a> {
    env: Environment<'a>,
    result_set: ResultSet,
}

impl<'a> WriteReport<'a> {
    pub async fn write_report(self) -> PartialResult<ExitStatus> {
        let output_file_path = &self.env.app_config.output_file_path;
        report::write_to_file(output_file_path, &self.result_set)
            .await
            .with_context(|| format!("Failed to write report to '{}'", output_file_path))?;
        info!("Saved {} matches to '{}'.", self.result_set.len(), output_file_path);

        if self.result_set.is_empty() {
            self.env.console.attention("No host name found on any server.");
        }

        self.env
            .console
            .ok(format!("Saved results to file '{}'.", output_file_path));
        self.env.console.print_finished();

        Ok(ExitStatus::Ok)
    }
}
