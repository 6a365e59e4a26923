// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::app::console::{Console, ConsoleOpts};
use crate::app::{AppConfig, ExitStatus};

pub mod check;

/** Return type for App modules that go through multiple steps
 *
 * An App module might go through multiple distinct steps to eventually fulfill its task. Along the way, errors might
 * occur. But what if a step finishes without errors but still couldn't obtain the necessary information for the next
 * step to proceed? For this use case, `PartialError::Failed` carries the exit status to return early with.
 */
pub type PartialResult<T> = std::result::Result<T, PartialError>;

#[derive(Debug)]
pub enum PartialError {
    Failed(ExitStatus),
    Err(anyhow::Error),
}

impl From<anyhow::Error> for PartialError {
    fn from(err: anyhow::Error) -> Self {
        PartialError::Err(err)
    }
}

impl From<crate::Error> for PartialError {
    fn from(err: crate::Error) -> Self {
        PartialError::Err(err.into())
    }
}

impl From<crate::zabbix::Error> for PartialError {
    fn from(err: crate::zabbix::Error) -> Self {
        PartialError::Err(err.into())
    }
}

/** Pass environment like configs and console access from step to step
 */
pub struct Environment<'a> {
    pub app_config: &'a AppConfig,
    pub console: Console,
}

impl<'a> Environment<'a> {
    pub fn new(app_config: &'a AppConfig) -> Environment<'a> {
        let console = Console::new(ConsoleOpts::from(app_config));
        Environment { app_config, console }
    }
}
