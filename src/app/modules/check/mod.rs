// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use tracing::info;

use crate::app::modules::PartialResult;
use crate::app::AppConfig;
use crate::app::ExitStatus;

mod steps;

use steps::HostCheck;

pub async fn run(app_config: &AppConfig) -> PartialResult<ExitStatus> {
    info!("check module selected.");

    HostCheck::init(app_config)?
        .load_inputs()
        .await?
        .check_hosts()
        .await?
        .write_report()
        .await
}
