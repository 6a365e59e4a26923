// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Client for the Zabbix JSON-RPC API restricted to what a host presence check needs: logging in and searching hosts.

use std::fmt;
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, trace};

pub use error::Error;
pub use jsonrpc::{Reply, Request, RpcError};
pub use server::{ServerConfig, ServerConfigs};

pub mod error;
pub mod jsonrpc;
pub mod server;

pub type Result<T> = std::result::Result<T, Error>;

/// Session credential issued by a successful `user.login`; only valid for the server that issued it.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new<T: Into<String>>(token: T) -> AuthToken {
        AuthToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZabbixClientOpts {
    accept_invalid_certs: bool,
}

impl ZabbixClientOpts {
    pub fn new(accept_invalid_certs: bool) -> ZabbixClientOpts {
        ZabbixClientOpts { accept_invalid_certs }
    }
}

/// Thin JSON-RPC client; cheap to clone, all clones share one connection pool.
#[derive(Clone)]
pub struct ZabbixClient {
    http_client: Arc<reqwest::Client>,
}

impl ZabbixClient {
    pub fn new(opts: ZabbixClientOpts) -> Result<ZabbixClient> {
        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(opts.accept_invalid_certs)
            .build()
            .map_err(|e| Error::ClientSetupError { source: e })?;

        Ok(ZabbixClient {
            http_client: Arc::new(http_client),
        })
    }

    /// Logs in at `server`.
    ///
    /// Returns `Ok(None)` if the server does not hand out a token, e.g., because of wrong credentials. Only transport
    /// failures are returned as errors.
    #[instrument(name = "authenticate", level = "info", skip(self, server), fields(server = %server.name()))]
    pub async fn authenticate(&self, server: &ServerConfig) -> Result<Option<AuthToken>> {
        let request = Request::login(server.user(), server.password());

        match self.call::<_, String>(server.url(), &request).await {
            Reply::Success(token) if !token.is_empty() => {
                info!("Authentication at '{}' succeeded", server.url());
                Ok(Some(AuthToken::new(token)))
            }
            Reply::Success(_) => {
                error!("Authentication at '{}' failed: {}", server.url(), "empty token");
                Ok(None)
            }
            Reply::Rejected(err) => {
                error!("Authentication at '{}' failed: {}", server.url(), err);
                Ok(None)
            }
            Reply::Malformed(details) => {
                error!("Authentication at '{}' failed: {}", server.url(), details);
                Ok(None)
            }
            Reply::Transport(err) => Err(err),
        }
    }

    /// Checks if `server` knows a host matching `hostname`.
    ///
    /// Error objects and unexpected responses count as "not found".
    #[instrument(name = "host exists", level = "debug", skip(self, server, token), fields(server = %server.name()))]
    pub async fn host_exists(&self, server: &ServerConfig, token: &AuthToken, hostname: &str) -> Result<bool> {
        let request = Request::host_get(hostname, token.as_str());

        let exists = match self.call::<_, Vec<Value>>(server.url(), &request).await {
            Reply::Success(hosts) => !hosts.is_empty(),
            Reply::Rejected(err) => {
                debug!("Search for host '{}' rejected: {}", hostname, err);
                false
            }
            Reply::Malformed(details) => {
                debug!("Search for host '{}' returned unexpected response: {}", hostname, details);
                false
            }
            Reply::Transport(err) => return Err(err),
        };
        info!(
            "Host '{}' on '{}': {}",
            hostname,
            server.url(),
            if exists { "found" } else { "not found" }
        );

        Ok(exists)
    }

    async fn call<P: Serialize, T: DeserializeOwned>(&self, url: &str, request: &Request<'_, P>) -> Reply<T> {
        trace!("Sending '{}' request to '{}'", request.method(), url);
        match self.do_call(url, request).await {
            Ok(body) => Reply::decode(body),
            Err(err) => Reply::Transport(err),
        }
    }

    async fn do_call<P: Serialize>(&self, url: &str, request: &Request<'_, P>) -> Result<Value> {
        let res = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, jsonrpc::CONTENT_TYPE)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::TransportError {
                url: url.to_string(),
                why: "call failed",
                source: e,
            })?;

        let status = res.status();
        let body = res.bytes().await.map_err(|e| Error::TransportError {
            url: url.to_string(),
            why: "reading body failed",
            source: e,
        })?;

        serde_json::from_slice::<Value>(&body).map_err(|e| Error::InvalidBodyError {
            url: url.to_string(),
            status: status.as_u16(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use spectral::prelude::*;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn server_config(mock_server: &MockServer) -> ServerConfig {
        ServerConfig::new("test", mock_server.uri().as_str(), "Admin", "zabbix")
    }

    #[tokio::test]
    async fn authenticate_returns_token() {
        crate::utils::tests::logging::init();
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "application/json-rpc"))
            .and(body_partial_json(json!({
                "method": "user.login",
                "params": {"user": "Admin", "password": "zabbix"},
                "auth": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": "token", "id": 1})))
            .expect(1)
            .mount(&mock_server)
            .await;
        let client = ZabbixClient::new(Default::default()).unwrap();

        let token = client.authenticate(&server_config(&mock_server)).await;

        assert_that(&token).is_ok().is_equal_to(Some(AuthToken::new("token")));
    }

    #[tokio::test]
    async fn authenticate_with_wrong_credentials() {
        crate::utils::tests::logging::init();
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32602, "message": "Invalid params.", "data": "Login name or password is incorrect."},
                "id": 1
            })))
            .mount(&mock_server)
            .await;
        let client = ZabbixClient::new(Default::default()).unwrap();

        let token = client.authenticate(&server_config(&mock_server)).await;

        assert_that(&token).is_ok().is_none();
    }

    #[tokio::test]
    async fn authenticate_with_empty_token() {
        crate::utils::tests::logging::init();
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": "", "id": 1})))
            .mount(&mock_server)
            .await;
        let client = ZabbixClient::new(Default::default()).unwrap();

        let token = client.authenticate(&server_config(&mock_server)).await;

        assert_that(&token).is_ok().is_none();
    }

    #[tokio::test]
    async fn authenticate_with_non_json_body_fails() {
        crate::utils::tests::logging::init();
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;
        let client = ZabbixClient::new(Default::default()).unwrap();

        let token = client.authenticate(&server_config(&mock_server)).await;

        assert_that(&token).is_err();
    }

    #[tokio::test]
    async fn authenticate_at_unreachable_server_fails() {
        crate::utils::tests::logging::init();
        let server = ServerConfig::new("gone", "http://127.0.0.1:1/api_jsonrpc.php", "Admin", "zabbix");
        let client = ZabbixClient::new(Default::default()).unwrap();

        let token = client.authenticate(&server).await;

        assert_that(&token).is_err();
    }

    #[tokio::test]
    async fn host_exists_sends_token_and_search() {
        crate::utils::tests::logging::init();
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "host.get",
                "params": {"search": {"host": ["web-01"]}, "searchByAny": true},
                "auth": "token"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "result": [{"hostid": "10084"}], "id": 1})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        let client = ZabbixClient::new(Default::default()).unwrap();

        let exists = client
            .host_exists(&server_config(&mock_server), &AuthToken::new("token"), "web-01")
            .await;

        assert_that(&exists).is_ok().is_true();
    }

    #[tokio::test]
    async fn host_exists_with_empty_result() {
        crate::utils::tests::logging::init();
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": [], "id": 1})))
            .mount(&mock_server)
            .await;
        let client = ZabbixClient::new(Default::default()).unwrap();

        let exists = client
            .host_exists(&server_config(&mock_server), &AuthToken::new("token"), "web-01")
            .await;

        assert_that(&exists).is_ok().is_false();
    }

    #[tokio::test]
    async fn host_exists_with_error_object_is_not_found() {
        crate::utils::tests::logging::init();
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32602, "message": "Invalid params.", "data": "Session terminated, re-login, please."},
                "id": 1
            })))
            .mount(&mock_server)
            .await;
        let client = ZabbixClient::new(Default::default()).unwrap();

        let exists = client
            .host_exists(&server_config(&mock_server), &AuthToken::new("expired"), "web-01")
            .await;

        assert_that(&exists).is_ok().is_false();
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("0424bd59b807674191e7d77572075f33");

        assert_that(&format!("{:?}", token).contains("0424bd59")).is_false();
    }
}
