// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! JSON-RPC 2.0 envelopes as spoken by the Zabbix API.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::zabbix::Error;

pub const JSONRPC_VERSION: &str = "2.0";
pub const CONTENT_TYPE: &str = "application/json-rpc";
pub const REQUEST_ID: u64 = 1;

pub const METHOD_USER_LOGIN: &str = "user.login";
pub const METHOD_HOST_GET: &str = "host.get";

#[derive(Debug, Serialize)]
pub struct Request<'a, P: Serialize> {
    jsonrpc: &'static str,
    method: &'static str,
    params: P,
    id: u64,
    auth: Option<&'a str>,
}

impl<'a, P: Serialize> Request<'a, P> {
    pub fn method(&self) -> &'static str {
        self.method
    }
}

#[derive(Debug, Serialize)]
pub struct LoginParams<'a> {
    user: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostGetParams<'a> {
    search: HostSearch<'a>,
    search_by_any: bool,
}

#[derive(Debug, Serialize)]
pub struct HostSearch<'a> {
    host: Vec<&'a str>,
}

impl<'a> Request<'a, LoginParams<'a>> {
    pub fn login(user: &'a str, password: &'a str) -> Self {
        Request {
            jsonrpc: JSONRPC_VERSION,
            method: METHOD_USER_LOGIN,
            params: LoginParams { user, password },
            id: REQUEST_ID,
            auth: None,
        }
    }
}

impl<'a> Request<'a, HostGetParams<'a>> {
    pub fn host_get(hostname: &'a str, auth: &'a str) -> Self {
        Request {
            jsonrpc: JSONRPC_VERSION,
            method: METHOD_HOST_GET,
            params: HostGetParams {
                search: HostSearch { host: vec![hostname] },
                search_by_any: true,
            },
            id: REQUEST_ID,
            auth: Some(auth),
        }
    }
}

/// Error object of a JSON-RPC response, e.g., `{"code": -32602, "message": "Invalid params.", "data": "Login name or password is incorrect."}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)?;
        match &self.data {
            Some(Value::String(data)) => write!(f, ": {}", data),
            Some(Value::Null) | None => Ok(()),
            Some(data) => write!(f, ": {}", data),
        }
    }
}

/// Outcome of one JSON-RPC call, decoded once at the transport boundary.
#[derive(Debug)]
pub enum Reply<T> {
    /// The response carried a `result` of the expected type.
    Success(T),
    /// The server answered with an `error` object.
    Rejected(RpcError),
    /// The response was JSON, but neither a usable `result` nor an `error`.
    Malformed(String),
    /// The request never produced a JSON response.
    Transport(Error),
}

impl<T: DeserializeOwned> Reply<T> {
    pub fn decode(body: Value) -> Reply<T> {
        let mut body = match body {
            Value::Object(map) => map,
            other => return Reply::Malformed(format!("expected a JSON object, but got '{}'", other)),
        };

        if let Some(result) = body.remove("result") {
            return match serde_json::from_value::<T>(result) {
                Ok(result) => Reply::Success(result),
                Err(err) => Reply::Malformed(format!("unexpected 'result': {}", err)),
            };
        }

        if let Some(error) = body.remove("error") {
            return match serde_json::from_value::<RpcError>(error) {
                Ok(error) => Reply::Rejected(error),
                Err(err) => Reply::Malformed(format!("unexpected 'error': {}", err)),
            };
        }

        Reply::Malformed("neither 'result' nor 'error' present".to_string())
    }
}
