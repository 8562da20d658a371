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

//! # Smoke Test
//!
//! Checks that the emulated dumbbell works, without running an experiment: all host pairs must
//! reach each other, and iperf must be able to push traffic through the backbone.

use crate::config::RuntimeConfig;
use crate::dumbbell::DumbbellNetwork;
use crate::iperf;
use crate::Error;

use ccbench::hosts::{HostRole, PerSender, Sender};

use log::*;
use serde::Serialize;
use std::thread::sleep;

/// Backbone delay of the smoke test, in ms
pub const TEST_DELAY: u32 = 21;
/// Number of single pings in each direction
pub const TEST_PINGS: usize = 9;
/// Duration of the bandwidth test, in seconds
pub const TEST_BANDWIDTH_SECONDS: u32 = 10;

/// Results of the smoke test
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmokeReport {
    /// Number of pings sent
    pub pings_sent: u32,
    /// Number of pings answered
    pub pings_received: u32,
    /// Bandwidth measured between each sender and its receiver, in Mbit/s
    pub bandwidth: PerSender<Option<f64>>,
}

impl SmokeReport {
    /// Percentage of lost pings
    pub fn loss(&self) -> f64 {
        if self.pings_sent == 0 {
            0.0
        } else {
            100.0 * (self.pings_sent - self.pings_received) as f64 / self.pings_sent as f64
        }
    }
}

/// Build the dumbbell, test connectivity and bandwidth of both host pairs, and stop the network.
pub fn dumbbell_test(cfg: &RuntimeConfig) -> Result<SmokeReport, Error> {
    let net = DumbbellNetwork::start(TEST_DELAY, cfg)?;

    info!("*** Dumping host connections");
    net.dump_connections();

    let mut report = SmokeReport::default();

    info!("*** Testing network connectivity");
    for sender in Sender::BOTH.iter() {
        let (a, b) = (sender.host(), sender.receiver());
        for _ in 0..TEST_PINGS {
            ping(&net, a, b, &mut report)?;
            ping(&net, b, a, &mut report)?;
        }
    }
    info!("*** Results: {:.0}% dropped", report.loss());

    info!("*** Testing bandwidth");
    for sender in Sender::BOTH.iter() {
        let bw = bandwidth_test(&net, *sender, cfg)?;
        match bw {
            Some(bw) => {
                info!("*** Results: {} -> {}: {:.2} Mbits/sec", sender, sender.receiver(), bw)
            }
            None => warn!("*** No bandwidth reported for {}", sender.pair_label()),
        }
        *report.bandwidth.get_mut(*sender) = bw;
    }

    net.stop()?;
    Ok(report)
}

fn ping(
    net: &DumbbellNetwork,
    src: HostRole,
    dst: HostRole,
    report: &mut SmokeReport,
) -> Result<(), Error> {
    let result = net.ping(src, dst)?;
    match result.rtt_ms {
        Some((_, avg, _, _)) => info!("{} -> {}: {:.3} ms", src, dst, avg),
        None => info!("{} -> {}: X", src, dst),
    }
    report.pings_sent += result.sent;
    report.pings_received += result.received;
    Ok(())
}

fn bandwidth_test(
    net: &DumbbellNetwork,
    sender: Sender,
    cfg: &RuntimeConfig,
) -> Result<Option<f64>, Error> {
    let server_ip = net.addresses().get(sender.receiver()).to_string();
    let mut server = net.iperf(sender.receiver())?.args(iperf::test_server_args()).spawn()?;
    sleep(cfg.server_settle);

    let client = net
        .iperf(sender.host())?
        .args(iperf::test_client_args(&server_ip, TEST_BANDWIDTH_SECONDS))
        .output();

    if let Err(e) = server.terminate_and_wait(cfg.terminate_grace) {
        error!("{}", e);
    }
    let output = client?;
    debug!("iperf client output:\n{}", output.text());
    Ok(iperf::parse_bandwidth(&output.stdout))
}
