// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use tabwriter::TabWriter;

use crate::ResultSet;

pub mod styles;

/// Writes one aligned line per server: name, URL, authentication state, checked host names, and matches.
pub fn server_table<W: Write>(writer: &mut W, result_set: &ResultSet) -> Result<()> {
    let mut tw = TabWriter::new(vec![]);

    writeln!(tw, "server\turl\tauthenticated\tchecked\tfound")?;
    for check in result_set.servers() {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}",
            check.server_name(),
            check.url(),
            if check.is_authenticated() { "yes" } else { "no" },
            check.checked(),
            check.matches().len()
        )?;
    }

    let text_buffer = tw
        .into_inner()
        .map_err(|_| anyhow!("failed to finish TabWriter buffer"))?;
    let out = String::from_utf8(text_buffer).context("failed to convert TabWriter buffer to output")?;
    write!(writer, "{}", out)?;

    Ok(())
}
