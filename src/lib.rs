// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! zhost checks which Zabbix servers know which hosts.
//!
//! It logs in at every configured server concurrently, searches every host name, and collects one [`HostMatch`] per
//! (host name, server) pair the server confirmed.
//!
//! # Example
//!
//! ```no_run
//! use zhost::{HostChecker, ServerConfig, ZabbixClient};
//!
//! # async fn run() -> zhost::Result<()> {
//! let servers = vec![ServerConfig::new(
//!     "master",
//!     "https://master.zabbix.example.com/api_jsonrpc.php",
//!     "USER",
//!     "PASS",
//! )];
//! let hostnames = vec!["web-01.example.com".to_string()];
//!
//! let checker = HostChecker::new(ZabbixClient::new(Default::default())?);
//! let result_set = checker.check_all(&hostnames, &servers).await?;
//!
//! for host_match in result_set.matches() {
//!     println!("{} is known by {}", host_match.hostname(), host_match.server_name());
//! }
//! # Ok(())
//! # }
//! ```

pub use checker::{HostChecker, HostMatch, ResultSet, ServerCheck};
pub use error::Error;
pub use zabbix::{AuthToken, ServerConfig, ServerConfigs, ZabbixClient, ZabbixClientOpts};

#[cfg(feature = "app-cli")]
pub mod app;
pub mod checker;
pub mod error;
pub mod hostnames;
pub mod report;
pub mod statistics;
mod utils;
pub mod zabbix;

pub type Result<T> = std::result::Result<T, Error>;
