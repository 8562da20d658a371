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

//! # Telemetry Samples
//!
//! Two independent telemetry streams are recorded during an experiment: the congestion window,
//! sampled by the `tcp_probe` kernel module, and the throughput, reported by iperf once per
//! second. Both are normalized to a relative time before they are plotted.

use serde::Serialize;

/// Common interface of all samples, used for plotting and exporting.
pub trait Sample {
    /// Relative time of the sample in seconds
    fn time(&self) -> f64;
    /// Value of the sample
    fn value(&self) -> f64;
}

/// Congestion window sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CwndSample {
    /// Seconds since the first sample of the same sender
    pub time: f64,
    /// Congestion window in MSS
    pub cwnd: u32,
}

impl Sample for CwndSample {
    fn time(&self) -> f64 {
        self.time
    }

    fn value(&self) -> f64 {
        self.cwnd as f64
    }
}

/// Throughput sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughputSample {
    /// Seconds since the start of the experiment
    pub time: f64,
    /// Throughput in Mbit/s
    pub mbps: f64,
}

impl Sample for ThroughputSample {
    fn time(&self) -> f64 {
        self.time
    }

    fn value(&self) -> f64 {
        self.mbps
    }
}

/// Returns true if the time of the samples never decreases.
pub fn is_monotonic<S: Sample>(samples: &[S]) -> bool {
    samples.windows(2).all(|w| w[0].time() <= w[1].time())
}

/// Largest time and value of all series, or `None` if all series are empty.
pub fn extent<'a, S, I>(series: I) -> Option<(f64, f64)>
where
    S: Sample + 'a,
    I: IntoIterator<Item = &'a [S]>,
{
    series.into_iter().flat_map(|s| s.iter()).fold(None, |acc, s| match acc {
        None => Some((s.time(), s.value())),
        Some((t, v)) => Some((t.max(s.time()), v.max(s.value()))),
    })
}
