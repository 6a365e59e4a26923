// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, trace};

use crate::Result;

/// Reads one host name per line.
///
/// Lines are trimmed; blank lines are skipped because an empty search pattern matches every host of a server.
pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path.as_ref()).await?;
    let mut lines = BufReader::new(file).lines();

    let mut hostnames = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if let Some(hostname) = parse_line(&line) {
            hostnames.push(hostname);
        }
    }
    debug!("Read {} host names from '{}'", hostnames.len(), path.as_ref().display());

    Ok(hostnames)
}

pub fn from_str(str: &str) -> Vec<String> {
    str.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<String> {
    let hostname = line.trim();
    if hostname.is_empty() {
        trace!("Skipping blank line");
        return None;
    }

    Some(hostname.to_string())
}
