// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use thiserror::Error;
use tokio::task::JoinError;

/// Failures while talking to a Zabbix server.
///
/// Every variant is fatal for a run: an authentication rejection is not an error at this level but
/// a [`crate::zabbix::Reply::Rejected`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to set up HTTP client")]
    ClientSetupError { source: reqwest::Error },
    #[error("request to '{url}' failed: {why}")]
    TransportError {
        url: String,
        why: &'static str,
        source: reqwest::Error,
    },
    #[error("response from '{url}' with status {status} is not valid JSON")]
    InvalidBodyError {
        url: String,
        status: u16,
        source: serde_json::Error,
    },
    #[error("execution has been cancelled")]
    CancelledError,
    #[error("execution panicked")]
    RuntimePanicError,
}

impl From<JoinError> for Error {
    fn from(error: JoinError) -> Self {
        if error.is_cancelled() {
            return Error::CancelledError;
        }
        Error::RuntimePanicError
    }
}
