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

//! # Traffic Generation
//!
//! Arguments for iperf (version 2), and parsing of its human readable output.

use ccbench::params::ExperimentParameters;

use regex::Regex;

/// Port on which all iperf servers listen
pub const IPERF_PORT: u16 = 5001;
/// TCP window size of servers and clients
pub const IPERF_WINDOW: &str = "16m";
/// Maximum segment size of the clients
pub const IPERF_MSS: u32 = 1460;

/// Arguments of the iperf server of a receiver
pub fn server_args() -> Vec<String> {
    vec![
        "-s".to_string(),
        "-p".to_string(),
        IPERF_PORT.to_string(),
        "-w".to_string(),
        IPERF_WINDOW.to_string(),
    ]
}

/// Arguments of the iperf client of a sender. The client reports the throughput every second as
/// CSV, uses the congestion control algorithm of the experiment, and disables Nagle's algorithm.
pub fn client_args(server: &str, params: &ExperimentParameters) -> Vec<String> {
    vec![
        "-c".to_string(),
        server.to_string(),
        "-p".to_string(),
        IPERF_PORT.to_string(),
        "-i".to_string(),
        "1".to_string(),
        "-w".to_string(),
        IPERF_WINDOW.to_string(),
        "-M".to_string(),
        IPERF_MSS.to_string(),
        "-N".to_string(),
        "-Z".to_string(),
        params.algorithm.clone(),
        "-t".to_string(),
        params.runtime.to_string(),
        "-y".to_string(),
        "C".to_string(),
    ]
}

/// Arguments of a plain bandwidth test server
pub fn test_server_args() -> Vec<String> {
    vec!["-s".to_string(), "-p".to_string(), IPERF_PORT.to_string()]
}

/// Arguments of a plain bandwidth test client, reporting in Mbit/s.
pub fn test_client_args(server: &str, seconds: u32) -> Vec<String> {
    vec![
        "-c".to_string(),
        server.to_string(),
        "-p".to_string(),
        IPERF_PORT.to_string(),
        "-t".to_string(),
        seconds.to_string(),
        "-f".to_string(),
        "m".to_string(),
    ]
}

/// Parse the bandwidth of the last report in the human readable output, converted to Mbit/s.
pub fn parse_bandwidth(output: &str) -> Option<f64> {
    let re = Regex::new(r"([\d.]+) ([KMG]?)bits/sec").unwrap();
    let c = re.captures_iter(output).last()?;
    let value: f64 = c.get(1)?.as_str().parse().ok()?;
    let scale = match c.get(2).map(|m| m.as_str()) {
        Some("G") => 1000.0,
        Some("M") => 1.0,
        Some("K") => 0.001,
        _ => 0.000_001,
    };
    Some(value * scale)
}
