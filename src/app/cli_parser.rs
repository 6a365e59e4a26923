// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! This file is used by the build script. Therefore all functions generating the app command line parser must be included
//! here and may only depend on clap.

use clap::{crate_name, Arg, ArgAction, Command};

pub static DEFAULT_SERVERS_FILE: &str = "zabbix_servers.toml";
pub static DEFAULT_HOSTNAMES_FILE: &str = "hostnames.txt";
pub static DEFAULT_OUTPUT_FILE: &str = "zabbix_hosts_check.csv";

pub fn create_parser() -> Command {
    Command::new(crate_name!())
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("servers")
                .short('c')
                .long("servers")
                .value_name("FILE")
                .default_value(DEFAULT_SERVERS_FILE)
                .help("Reads Zabbix servers from TOML file")
                .long_help(
                    r#"Reads Zabbix servers from TOML file. Every server is a [[server]] table with name, url, user, and password.
Example:
  [[server]]
  name = "master"
  url = "https://master.zabbix.example.com/api_jsonrpc.php"
  user = "USER"
  password = "PASS"
"#,
                ),
        )
        .arg(
            Arg::new("hostnames")
                .short('i')
                .long("hostnames")
                .value_name("FILE")
                .default_value(DEFAULT_HOSTNAMES_FILE)
                .help("Reads host names to check from file, one per line"),
        )
        .arg(
            Arg::new("output-file")
                .short('o')
                .long("output")
                .value_name("FILE")
                .default_value(DEFAULT_OUTPUT_FILE)
                .help("Sets path to CSV report file"),
        )
        .arg(
            Arg::new("insecure")
                .long("insecure")
                .action(ArgAction::SetTrue)
                .help("Accepts invalid TLS certificates of Zabbix servers"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Does not print anything but errors"),
        )
        // This is a special option that is not reflected in AppConfig, but is checked during setup in `app.rs`.
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disables colorful output"),
        )
        // This is a special option that is not reflected in AppConfig, but is checked during setup in `app.rs` and sets
        // the global AtomicBool `ASCII_MODE` in `zhost::app::output::styles`.
        .arg(
            Arg::new("ascii")
                .long("ascii")
                .action(ArgAction::SetTrue)
                .help("Uses only ASCII compatible characters for output"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Uses debug formatting for logging -- much more verbose"),
        )
        .arg(
            Arg::new("v")
                .short('v')
                .action(ArgAction::Count)
                .help("Sets the level of verbosity"),
        )
}
