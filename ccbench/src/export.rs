// CCBench: TCP Congestion Control Experiments in Mininet
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Export parsed series as CSV, one row per sample.

use crate::hosts::{PerSender, Sender};
use crate::telemetry::Sample;
use crate::Result;

use csv::Writer;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Row {
    sender: Sender,
    time: f64,
    value: f64,
}

/// Write the series of both senders to `writer`. The columns are `sender`, `time` and `value`.
pub fn write_series<W: Write, S: Sample>(writer: W, data: &PerSender<Vec<S>>) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for (sender, samples) in data.iter() {
        for s in samples.iter() {
            wtr.serialize(Row { sender, time: s.time(), value: s.value() })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Write the series of both senders to a CSV file. See [`write_series`].
pub fn export_series<S: Sample>(path: impl AsRef<Path>, data: &PerSender<Vec<S>>) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_series(file, data)
}
