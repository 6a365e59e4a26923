// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! CSV report with one row per host match.

use std::io::Write;
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::checker::{HostMatch, ResultSet};
use crate::Result;

pub static HEADER: &[&str] = &["hostname", "zabbix_server"];

/// Writes the header and one CRLF-terminated row per match; fields are quoted only when necessary.
pub fn write<'a, W: Write, I: IntoIterator<Item = &'a HostMatch>>(writer: &mut W, matches: I) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    // Written explicitly so that a run without matches still yields the header.
    csv.write_record(HEADER)?;
    for host_match in matches {
        csv.serialize(host_match)?;
    }
    csv.flush()?;

    Ok(())
}

pub async fn write_to_file<P: AsRef<Path>>(path: P, result_set: &ResultSet) -> Result<()> {
    let mut buf = Vec::new();
    write(&mut buf, result_set.matches())?;

    let mut file = File::create(path.as_ref()).await?;
    file.write_all(&buf).await?;
    file.flush().await?;
    debug!("Wrote {} rows to '{}'", result_set.len(), path.as_ref().display());

    Ok(())
}
