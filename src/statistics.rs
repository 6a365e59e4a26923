// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use indexmap::IndexMap;

use crate::checker::ResultSet;

pub trait Statistics<'a> {
    type StatsOut;

    fn statistics(&'a self) -> Self::StatsOut;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStats<'a> {
    pub authenticated: bool,
    pub checked: usize,
    pub matches: usize,
    pub url: &'a str,
}

#[derive(Debug)]
pub struct ResultSetStats<'a> {
    pub servers: usize,
    pub authenticated: usize,
    pub auth_failures: usize,
    pub checked: usize,
    pub matches: usize,
    /// Per server in order of task completion
    pub per_server: IndexMap<&'a str, ServerStats<'a>>,
}

impl fmt::Display for ResultSetStats<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = format!(
            "{num_matches} {matches} from {num_servers} {servers} ({num_auth} authenticated, {num_failed} failed) for {num_checked} host checks",
            num_matches = self.matches,
            matches = if self.matches == 1 { "match" } else { "matches" },
            num_servers = self.servers,
            servers = if self.servers == 1 { "server" } else { "servers" },
            num_auth = self.authenticated,
            num_failed = self.auth_failures,
            num_checked = self.checked,
        );
        f.write_str(&str)
    }
}

impl<'a> Statistics<'a> for ResultSet {
    type StatsOut = ResultSetStats<'a>;

    fn statistics(&'a self) -> Self::StatsOut {
        let per_server: IndexMap<&'a str, ServerStats<'a>> = self
            .servers()
            .map(|x| {
                (
                    x.server_name(),
                    ServerStats {
                        authenticated: x.is_authenticated(),
                        checked: x.checked(),
                        matches: x.matches().len(),
                        url: x.url(),
                    },
                )
            })
            .collect();
        let authenticated = per_server.values().filter(|x| x.authenticated).count();

        ResultSetStats {
            servers: per_server.len(),
            authenticated,
            auth_failures: per_server.len() - authenticated,
            checked: per_server.values().map(|x| x.checked).sum(),
            matches: per_server.values().map(|x| x.matches).sum(),
            per_server,
        }
    }
}
