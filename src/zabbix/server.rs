// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Connection and credentials of one Zabbix API endpoint.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    name: String,
    url: String,
    user: String,
    password: String,
}

impl ServerConfig {
    pub fn new<T: Into<String>>(name: T, url: T, user: T, password: T) -> ServerConfig {
        ServerConfig {
            name: name.into(),
            url: url.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ParserError {
                what: self.url.clone(),
                to: "ServerConfig",
                why: "server name must not be empty".to_string(),
            });
        }
        let url = Url::parse(&self.url).map_err(|e| Error::ParserError {
            what: self.url.clone(),
            to: "ServerConfig",
            why: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::ParserError {
                what: self.url.clone(),
                to: "ServerConfig",
                why: format!("unsupported scheme '{}'", scheme),
            }),
        }
    }
}

// The password must never end up in logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

/// Ordered list of servers as read from a TOML file with one `[[server]]` table per server.
///
/// ```toml
/// [[server]]
/// name = "master"
/// url = "https://master.zabbix.example.com/api_jsonrpc.php"
/// user = "USER"
/// password = "PASS"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfigs {
    #[serde(rename = "server", default)]
    configs: Vec<ServerConfig>,
}

impl ServerConfigs {
    pub fn new(configs: Vec<ServerConfig>) -> Result<ServerConfigs> {
        let configs = ServerConfigs { configs };
        configs.validate()?;
        Ok(configs)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ServerConfigs> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let configs = ServerConfigs::from_str(&content)?;
        debug!(
            "Loaded {} server configs from '{}'.",
            configs.len(),
            path.as_ref().display()
        );

        Ok(configs)
    }

    fn validate(&self) -> Result<()> {
        if self.configs.is_empty() {
            return Err(Error::ParserError {
                what: "server configs".to_string(),
                to: "ServerConfigs",
                why: "at least one server must be configured".to_string(),
            });
        }

        let mut names = HashSet::new();
        for config in &self.configs {
            config.validate()?;
            if !names.insert(config.name()) {
                return Err(Error::ParserError {
                    what: config.name().to_string(),
                    to: "ServerConfigs",
                    why: "server names must be unique".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn as_slice(&self) -> &[ServerConfig] {
        &self.configs
    }
}

impl FromStr for ServerConfigs {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let configs: ServerConfigs = toml::from_str(s).map_err(|e| Error::ParserError {
            what: "server configs".to_string(),
            to: "ServerConfigs",
            why: e.to_string(),
        })?;
        configs.validate()?;

        Ok(configs)
    }
}
