// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Fan-out of host presence checks across all configured Zabbix servers.
//!
//! Every server gets its own task which authenticates and then checks the host names one after another. Tasks run
//! concurrently and share a single HTTP connection pool. A failed authentication only affects its own server, while a
//! transport failure of any server aborts the whole check.

use std::slice::Iter;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::task;
use tracing::{debug, info, instrument};

use crate::zabbix::{self, ServerConfig, ZabbixClient};

/// A host name confirmed to be present on a server; serializes as one report row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HostMatch {
    hostname: String,
    #[serde(rename = "zabbix_server")]
    server_name: String,
}

impl HostMatch {
    pub fn new<T: Into<String>, S: Into<String>>(hostname: T, server_name: S) -> HostMatch {
        HostMatch {
            hostname: hostname.into(),
            server_name: server_name.into(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

/// Outcome of checking all host names against one server.
#[derive(Debug, Clone)]
pub struct ServerCheck {
    server_name: String,
    url: String,
    authenticated: bool,
    checked: usize,
    matches: Vec<HostMatch>,
}

impl ServerCheck {
    pub fn new<T: Into<String>, S: Into<String>>(
        server_name: T,
        url: S,
        authenticated: bool,
        checked: usize,
        matches: Vec<HostMatch>,
    ) -> ServerCheck {
        ServerCheck {
            server_name: server_name.into(),
            url: url.into(),
            authenticated,
            checked,
            matches,
        }
    }

    fn auth_failed(server: &ServerConfig) -> ServerCheck {
        ServerCheck::new(server.name(), server.url(), false, 0, Vec::new())
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Number of host names actually sent to the server.
    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn matches(&self) -> &[HostMatch] {
        &self.matches
    }
}

/// All matches of one run, grouped by server in order of task completion.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    servers: Vec<ServerCheck>,
}

impl ResultSet {
    pub fn new(servers: Vec<ServerCheck>) -> ResultSet {
        ResultSet { servers }
    }

    /// Matches in server completion order, then host name input order.
    pub fn matches(&self) -> impl Iterator<Item = &HostMatch> {
        self.servers.iter().flat_map(|x| x.matches.iter())
    }

    pub fn servers(&self) -> Iter<ServerCheck> {
        self.servers.iter()
    }

    /// Number of matches
    pub fn len(&self) -> usize {
        self.servers.iter().map(|x| x.matches.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_matches(self) -> Vec<HostMatch> {
        self.servers.into_iter().flat_map(|x| x.matches).collect()
    }
}

#[derive(Clone)]
pub struct HostChecker {
    client: ZabbixClient,
}

impl HostChecker {
    pub fn new(client: ZabbixClient) -> HostChecker {
        HostChecker { client }
    }

    #[instrument(name = "check all", level = "info", skip(self, hostnames, servers), fields(hosts = hostnames.len(), servers = servers.len()))]
    pub async fn check_all(&self, hostnames: &[String], servers: &[ServerConfig]) -> zabbix::Result<ResultSet> {
        if hostnames.is_empty() {
            debug!("No host names to check; skipping all servers");
            return Ok(ResultSet::default());
        }

        let hostnames: Arc<Vec<String>> = Arc::new(hostnames.to_vec());

        debug!("Spawning {} server checks", servers.len());
        let mut checks: FuturesUnordered<_> = servers
            .iter()
            .cloned()
            .map(|server| task::spawn(check_server(self.client.clone(), hostnames.clone(), server)))
            .collect();

        let mut servers = Vec::with_capacity(checks.len());
        while let Some(check) = checks.next().await {
            match check.map_err(zabbix::Error::from).and_then(|check| check) {
                Ok(check) => servers.push(check),
                Err(err) => {
                    // Dropping a JoinHandle only detaches its task.
                    debug!("Aborting {} remaining server checks", checks.len());
                    for check in checks.iter() {
                        check.abort();
                    }
                    return Err(err);
                }
            }
        }

        Ok(ResultSet::new(servers))
    }
}

#[instrument(name = "check server", level = "info", skip(client, hostnames, server), fields(server = %server.name()))]
async fn check_server(
    client: ZabbixClient,
    hostnames: Arc<Vec<String>>,
    server: ServerConfig,
) -> zabbix::Result<ServerCheck> {
    let token = match client.authenticate(&server).await? {
        Some(token) => token,
        None => return Ok(ServerCheck::auth_failed(&server)),
    };

    let mut matches = Vec::new();
    for hostname in hostnames.iter() {
        if client.host_exists(&server, &token, hostname).await? {
            matches.push(HostMatch::new(hostname.as_str(), server.name()));
        }
    }
    info!("Server '{}' checked: {} hosts found", server.url(), matches.len());

    Ok(ServerCheck::new(server.name(), server.url(), true, hostnames.len(), matches))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use spectral::prelude::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn mock_login_ok(mock_server: &MockServer) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "user.login"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": "token", "id": 1})))
            .mount(mock_server)
            .await;
    }

    async fn mock_login_failed(mock_server: &MockServer) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "user.login"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32602, "message": "Invalid params.", "data": "Login name or password is incorrect."},
                "id": 1
            })))
            .mount(mock_server)
            .await;
    }

    async fn mock_host(mock_server: &MockServer, hostname: &str, exists: bool) {
        let result = if exists { json!([{"hostid": "10084", "host": hostname}]) } else { json!([]) };
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "host.get",
                "params": {"search": {"host": [hostname]}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": result, "id": 1})))
            .mount(mock_server)
            .await;
    }

    // Nothing listens on port 1, so connections are refused.
    const UNREACHABLE_URL: &str = "http://127.0.0.1:1/api_jsonrpc.php";

    fn server(name: &str, mock_server: &MockServer) -> ServerConfig {
        ServerConfig::new(name, mock_server.uri().as_str(), "Admin", "zabbix")
    }

    fn hostnames(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn checker() -> HostChecker {
        HostChecker::new(ZabbixClient::new(Default::default()).unwrap())
    }

    #[tokio::test]
    async fn one_server_authenticated_one_rejected() {
        crate::utils::tests::logging::init();
        let a = MockServer::start().await;
        mock_login_ok(&a).await;
        mock_host(&a, "host1", true).await;
        mock_host(&a, "host2", false).await;
        let b = MockServer::start().await;
        mock_login_failed(&b).await;
        let servers = vec![server("A", &a), server("B", &b)];

        let res = checker().check_all(&hostnames(&["host1", "host2"]), &servers).await;

        assert_that(&res).is_ok();
        let res = res.unwrap();
        assert_that(&res.clone().into_matches()).is_equal_to(vec![HostMatch::new("host1", "A")]);
        assert_that(&res.matches().any(|x| x.server_name() == "B")).is_false();
        let b_check = res.servers().find(|x| x.server_name() == "B").unwrap();
        assert_that(&b_check.is_authenticated()).is_false();
        assert_that(&b_check.checked()).is_equal_to(0);
    }

    #[tokio::test]
    async fn rejected_server_is_never_searched() {
        crate::utils::tests::logging::init();
        let b = MockServer::start().await;
        mock_login_failed(&b).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "host.get"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": [{}], "id": 1})))
            .expect(0)
            .mount(&b)
            .await;

        let res = checker().check_all(&hostnames(&["host1"]), &[server("B", &b)]).await;

        assert_that(&res).is_ok().map(|x| &x.servers).has_length(1);
    }

    #[tokio::test]
    async fn single_server_all_hosts_exist() {
        crate::utils::tests::logging::init();
        let a = MockServer::start().await;
        mock_login_ok(&a).await;
        mock_host(&a, "h1", true).await;
        mock_host(&a, "h2", true).await;

        let res = checker().check_all(&hostnames(&["h1", "h2"]), &[server("A", &a)]).await;

        assert_that(&res).is_ok();
        let matches = res.unwrap().into_matches();
        assert_that(&matches).is_equal_to(vec![HostMatch::new("h1", "A"), HostMatch::new("h2", "A")]);
    }

    #[tokio::test]
    async fn same_host_on_two_servers_is_reported_twice() {
        crate::utils::tests::logging::init();
        let a = MockServer::start().await;
        mock_login_ok(&a).await;
        mock_host(&a, "h1", true).await;
        let b = MockServer::start().await;
        mock_login_ok(&b).await;
        mock_host(&b, "h1", true).await;

        let res = checker()
            .check_all(&hostnames(&["h1"]), &[server("A", &a), server("B", &b)])
            .await;

        assert_that(&res).is_ok();
        let mut matches = res.unwrap().into_matches();
        matches.sort();
        assert_that(&matches).is_equal_to(vec![HostMatch::new("h1", "A"), HostMatch::new("h1", "B")]);
    }

    #[tokio::test]
    async fn empty_hostnames_contact_no_server() {
        crate::utils::tests::logging::init();
        let a = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": "token", "id": 1})))
            .expect(0)
            .mount(&a)
            .await;

        let res = checker().check_all(&[], &[server("A", &a)]).await;

        assert_that(&res).is_ok().matches(|x| x.is_empty());
    }

    #[tokio::test]
    async fn repeated_runs_yield_same_matches() {
        crate::utils::tests::logging::init();
        let a = MockServer::start().await;
        mock_login_ok(&a).await;
        mock_host(&a, "h1", true).await;
        mock_host(&a, "h2", false).await;
        mock_host(&a, "h3", true).await;
        let b = MockServer::start().await;
        mock_login_ok(&b).await;
        mock_host(&b, "h1", false).await;
        mock_host(&b, "h2", true).await;
        mock_host(&b, "h3", true).await;
        let servers = vec![server("A", &a), server("B", &b)];
        let hostnames = hostnames(&["h1", "h2", "h3"]);
        let checker = checker();

        let mut first = checker.check_all(&hostnames, &servers).await.unwrap().into_matches();
        let mut second = checker.check_all(&hostnames, &servers).await.unwrap().into_matches();
        first.sort();
        second.sort();

        assert_that(&first).has_length(4);
        assert_that(&first).is_equal_to(second);
    }

    #[tokio::test]
    async fn hosts_are_checked_in_input_order() {
        crate::utils::tests::logging::init();
        let a = MockServer::start().await;
        mock_login_ok(&a).await;
        for name in &["c", "a", "b"] {
            mock_host(&a, name, true).await;
        }

        let res = checker()
            .check_all(&hostnames(&["c", "a", "b"]), &[server("A", &a)])
            .await
            .unwrap();

        let names: Vec<_> = res.matches().map(|x| x.hostname().to_string()).collect();
        assert_that(&names).is_equal_to(hostnames(&["c", "a", "b"]));
    }

    #[tokio::test]
    async fn transport_failure_stops_other_servers() {
        crate::utils::tests::logging::init();
        let slow = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "user.login"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "result": "token", "id": 1}))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&slow)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "host.get"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": [], "id": 1})))
            .mount(&slow)
            .await;
        let unreachable = ServerConfig::new("gone", UNREACHABLE_URL, "Admin", "zabbix");

        let res = checker()
            .check_all(&hostnames(&["h1", "h2", "h3", "h4", "h5"]), &[server("slow", &slow), unreachable])
            .await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_that(&res).is_err();
        let requests = slow.received_requests().await.unwrap();
        assert_that(&requests.len()).is_less_than_or_equal_to(1);
    }

    #[tokio::test]
    async fn transport_failure_aborts_check() {
        crate::utils::tests::logging::init();
        let a = MockServer::start().await;
        mock_login_ok(&a).await;
        mock_host(&a, "h1", true).await;
        let unreachable = ServerConfig::new("gone", UNREACHABLE_URL, "Admin", "zabbix");

        let res = checker()
            .check_all(&hostnames(&["h1"]), &[server("A", &a), unreachable])
            .await;

        assert_that(&res).is_err();
    }
}
