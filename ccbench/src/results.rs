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

//! Post-processing of a finished experiment: loading both telemetry streams, rendering the plots
//! and exporting the parsed series.

use crate::export::export_series;
use crate::hosts::{HostAddresses, PerSender, Sender};
use crate::naming::{csv_for, ArtifactNames};
use crate::parser::{parse_iperf_file, parse_tcpprobe_file, ThroughputTrace, TimeOrigin};
use crate::plot::{draw_cwnd_plot, draw_fairness_plot};
use crate::telemetry::{CwndSample, ThroughputSample};
use crate::Result;

/// Parsed telemetry of a single experiment
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentData {
    /// Congestion window of both senders, each relative to its own first sample
    pub cwnd: PerSender<Vec<CwndSample>>,
    /// Throughput of both senders, relative to the first report of `h1`
    pub throughput: PerSender<ThroughputTrace>,
}

impl ExperimentData {
    /// Parse the capture file and both iperf files. A missing or malformed file is an error.
    pub fn load(names: &ArtifactNames, addrs: &HostAddresses) -> Result<Self> {
        let cwnd = parse_tcpprobe_file(names.tcpprobe(), addrs)?;
        let h1 = parse_iperf_file(
            names.iperf(Sender::H1),
            addrs.sender(Sender::H1),
            TimeOrigin::FirstSample,
        )?;
        let h3 = parse_iperf_file(
            names.iperf(Sender::H3),
            addrs.sender(Sender::H3),
            TimeOrigin::At(h1.origin),
        )?;
        Ok(Self { cwnd, throughput: PerSender::new(h1, h3) })
    }

    /// Throughput samples of both senders, without the summaries
    pub fn throughput_samples(&self) -> PerSender<Vec<ThroughputSample>> {
        self.throughput.map(|t| t.samples.clone())
    }

    /// Render the congestion window plot and the fairness plot.
    pub fn render(&self, names: &ArtifactNames, algorithm: &str, delay: u32) -> Result<()> {
        draw_cwnd_plot(names.cwnd_plot(), &self.cwnd, algorithm, delay)?;
        draw_fairness_plot(names.fairness_plot(), &self.throughput_samples(), algorithm, delay)
    }

    /// Export both series as CSV files next to the plots
    pub fn export_csv(&self, names: &ArtifactNames) -> Result<()> {
        export_series(csv_for(&names.cwnd_plot()), &self.cwnd)?;
        export_series(csv_for(&names.fairness_plot()), &self.throughput_samples())
    }
}
