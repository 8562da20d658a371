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

//! # Telemetry Parsers
//!
//! Parsers for the output of `cat /proc/net/tcpprobe` (space separated) and of
//! `iperf -y C` (comma separated). Both readers use fixed field names, since neither tool writes a
//! header line.

use crate::hosts::{HostAddresses, PerSender, Sender};
use crate::telemetry::{CwndSample, ThroughputSample};
use crate::{Error, Result};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Field names of a `tcp_probe` record
pub const TCPPROBE_FIELDS: [&str; 11] = [
    "time",
    "src_addr_port",
    "dst_addr_port",
    "bytes",
    "next_seq",
    "unacknowledged",
    "cwnd",
    "slow_start",
    "swnd",
    "smoothed_rtt",
    "rwnd",
];

/// Field names of an iperf CSV record
pub const IPERF_FIELDS: [&str; 9] = [
    "timestamp",
    "src_addr",
    "src_port",
    "dst_addr",
    "dst_port",
    "id",
    "interval",
    "bytes",
    "bps",
];

/// Single record written by the `tcp_probe` kernel module. Only the fields up to the congestion
/// window are required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TcpProbeRecord {
    /// Kernel timestamp in seconds
    pub time: f64,
    /// Source, formatted as `addr:port`
    pub src_addr_port: String,
    /// Destination, formatted as `addr:port`
    pub dst_addr_port: String,
    /// Length of the segment
    pub bytes: Option<u64>,
    /// Next sequence number (hex)
    pub next_seq: Option<String>,
    /// Oldest unacknowledged sequence number (hex)
    pub unacknowledged: Option<String>,
    /// Congestion window
    pub cwnd: u32,
    /// Slow start threshold
    pub slow_start: Option<u64>,
    /// Send window
    pub swnd: Option<u64>,
    /// Smoothed round trip time
    pub smoothed_rtt: Option<u64>,
    /// Receive window
    pub rwnd: Option<u64>,
}

/// Single interval report of `iperf -y C`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IperfRecord {
    /// Compact local time (`%Y%m%d%H%M%S`)
    pub timestamp: String,
    /// Source address
    pub src_addr: String,
    /// Source port
    pub src_port: u16,
    /// Destination address
    pub dst_addr: String,
    /// Destination port
    pub dst_port: u16,
    /// Transfer ID
    pub id: String,
    /// Interval of the report (e.g. `1.0-2.0`)
    pub interval: String,
    /// Bytes transferred in the interval
    pub bytes: u64,
    /// Throughput in bits per second
    pub bps: f64,
}

/// Time origin for throughput traces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOrigin {
    /// The first sample of the trace is time zero
    FirstSample,
    /// Time zero is given explicitly, usually the origin of the first sender's trace.
    At(NaiveDateTime),
}

/// Throughput samples of one sender
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputTrace {
    /// Interval samples, without the final summary
    pub samples: Vec<ThroughputSample>,
    /// The trailing entry of the file, i.e., the summary over the entire run
    pub summary: Option<ThroughputSample>,
    /// Time zero of the trace
    pub origin: NaiveDateTime,
    /// Number of samples which collided with the previous one and were moved by one second.
    pub collisions: usize,
    /// Number of samples which would have been placed before the previous sample.
    pub out_of_order: usize,
}

/// Parse the congestion window of both senders from the output of `tcp_probe`. Only records whose
/// source contains the address of `h1` or `h3` are kept. The time of every sample is relative to
/// the first sample of the same sender.
pub fn parse_tcpprobe<R: Read>(
    reader: R,
    addrs: &HostAddresses,
) -> Result<PerSender<Vec<CwndSample>>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = StringRecord::from(TCPPROBE_FIELDS.to_vec());

    let mut data: PerSender<Vec<CwndSample>> = PerSender::default();
    let mut origin: PerSender<Option<f64>> = PerSender::default();

    for record in rdr.records() {
        let record = record?;
        // rows of other flows are skipped before they are parsed
        let src = record.get(1).unwrap_or_default();
        let sender = if src.contains(addrs.sender(Sender::H1)) {
            Sender::H1
        } else if src.contains(addrs.sender(Sender::H3)) {
            Sender::H3
        } else {
            continue;
        };
        let row: TcpProbeRecord = record.deserialize(Some(&headers))?;

        let t0 = *origin.get_mut(sender).get_or_insert(row.time);
        let samples = data.get_mut(sender);
        let mut time = row.time - t0;
        if let Some(last) = samples.last() {
            if time < last.time {
                warn!("tcp_probe sample of {} at {} is out of order!", sender, row.time);
                time = last.time;
            }
        }
        samples.push(CwndSample { time, cwnd: row.cwnd });
    }

    Ok(data)
}

/// Read and parse a `tcp_probe` capture file. See [`parse_tcpprobe`].
pub fn parse_tcpprobe_file(
    path: impl AsRef<Path>,
    addrs: &HostAddresses,
) -> Result<PerSender<Vec<CwndSample>>> {
    info!("*** Parsing tcpprobe data...");
    let file = open(path.as_ref())?;
    parse_tcpprobe(BufReader::new(file), addrs)
}

/// Parse the throughput of one sender from the CSV output of iperf. Only records whose source
/// contains `addr` are kept.
///
/// The time of every sample is the number of whole seconds since `origin`. Since iperf only
/// reports the time with a resolution of one second, two consecutive reports may carry the same
/// timestamp. In this case, the second one is moved one second later. If even that would place a
/// sample before its predecessor (more than two reports within the same second), the sample is
/// placed one second after its predecessor and a warning is logged.
///
/// The last entry of the trace is the summary that iperf writes at the end of the run. It is
/// removed from the samples and returned separately.
pub fn parse_iperf<R: Read>(reader: R, addr: &str, origin: TimeOrigin) -> Result<ThroughputTrace> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = StringRecord::from(IPERF_FIELDS.to_vec());

    let mut origin = match origin {
        TimeOrigin::FirstSample => None,
        TimeOrigin::At(t) => Some(t),
    };
    let mut samples: Vec<ThroughputSample> = Vec::new();
    let mut collisions = 0;
    let mut out_of_order = 0;

    for record in rdr.records() {
        let record = record?;
        if !record.get(1).unwrap_or_default().contains(addr) {
            continue;
        }
        let row: IperfRecord = record.deserialize(Some(&headers))?;

        let t = parse_timestamp(&row.timestamp)?;
        let t0 = *origin.get_or_insert(t);
        let mut time = t.signed_duration_since(t0).num_seconds() as f64;
        if let Some(last) = samples.last() {
            if time == last.time {
                time += 1.0;
                collisions += 1;
            } else if time < last.time {
                warn!(
                    "iperf report of {} at {} precedes the previous report at {}s",
                    addr, row.timestamp, last.time
                );
                time = last.time + 1.0;
                out_of_order += 1;
            }
        }
        samples.push(ThroughputSample { time, mbps: row.bps / 1_000_000.0 });
    }

    let origin = match origin {
        Some(t) if !samples.is_empty() => t,
        _ => return Err(Error::EmptyTrace { addr: addr.to_string(), file: Default::default() }),
    };

    let summary = samples.pop();
    if let Some(s) = summary.as_ref() {
        info!("{}: time={}, bandwidth={}", addr, s.time, s.mbps);
    }

    Ok(ThroughputTrace { samples, summary, origin, collisions, out_of_order })
}

/// Read and parse an iperf output file. See [`parse_iperf`].
pub fn parse_iperf_file(
    path: impl AsRef<Path>,
    addr: &str,
    origin: TimeOrigin,
) -> Result<ThroughputTrace> {
    info!("*** Parsing iperf data...");
    let path = path.as_ref();
    let file = open(path)?;
    parse_iperf(BufReader::new(file), addr, origin).map_err(|e| match e {
        Error::EmptyTrace { addr, .. } => Error::EmptyTrace { addr, file: path.to_path_buf() },
        e => e,
    })
}

/// Parse the compact timestamp written by iperf (`%Y%m%d%H%M%S`). Newer iperf versions append
/// milliseconds (`.123`), which are ignored.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let err = || Error::InvalidTimestamp(s.to_string());
    let whole = s.split('.').next().unwrap_or_default();
    if whole.len() != 14 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    let num = |from: usize, to: usize| whole[from..to].parse::<u32>().map_err(|_| err());

    NaiveDate::from_ymd_opt(num(0, 4)? as i32, num(4, 6)?, num(6, 8)?)
        .and_then(|d| d.and_hms_opt(num(8, 10).ok()?, num(10, 12).ok()?, num(12, 14).ok()?))
        .ok_or_else(err)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::MissingFile(path.to_path_buf())
        } else {
            e.into()
        }
    })
}
