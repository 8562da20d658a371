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

//! # Experiment Parameters

use crate::{Error, Result};

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Congestion control algorithms tested by default
pub const DEFAULT_ALGORITHMS: [&str; 2] = ["reno", "cubic"];
/// Backbone one-way propagation delays (in ms) tested by default
pub const DEFAULT_DELAYS: [u32; 3] = [21, 81, 162];
/// Default runtime of the iperf clients (in seconds)
pub const DEFAULT_RUNTIME: u32 = 1000;
/// Default delay between starting the first and the second iperf client (in seconds)
pub const DEFAULT_STAGGER_DELAY: u32 = 250;

/// Parameters of a single experiment run, i.e., one algorithm with one backbone delay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExperimentParameters {
    /// Name of the TCP congestion control algorithm (as known to the kernel, e.g. `cubic`)
    pub algorithm: String,
    /// One-way propagation delay of the backbone link, in milliseconds
    pub delay: u32,
    /// Runtime of each iperf client, in seconds
    pub runtime: u32,
    /// Time to wait before the second client is started, in seconds
    pub stagger_delay: u32,
}

impl ExperimentParameters {
    /// Create new experiment parameters, checking that they are valid.
    pub fn new(
        algorithm: impl Into<String>,
        delay: u32,
        runtime: u32,
        stagger_delay: u32,
    ) -> Result<Self> {
        let algorithm = algorithm.into();
        if algorithm.trim().is_empty() {
            return Err(Error::InvalidParameters("the algorithm name is empty".into()));
        }
        if algorithm.contains(char::is_whitespace) || algorithm.contains('/') {
            return Err(Error::InvalidParameters(format!(
                "the algorithm name {:?} is not a valid identifier",
                algorithm
            )));
        }
        if runtime == 0 {
            return Err(Error::InvalidParameters("the runtime must be positive".into()));
        }
        Ok(Self { algorithm, delay, runtime, stagger_delay })
    }

    /// Stagger delay as a duration
    pub fn stagger(&self) -> Duration {
        Duration::from_secs(self.stagger_delay as u64)
    }
}

impl fmt::Display for ExperimentParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "algorithm={}, delay={}ms, runtime={}s, stagger={}s",
            self.algorithm, self.delay, self.runtime, self.stagger_delay
        )
    }
}

/// # Sweep
///
/// All combinations of algorithms and delays to test. The iteration order is the outer loop over
/// the algorithms, and the inner loop over the delays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sweep {
    /// Algorithms to test
    pub algorithms: Vec<String>,
    /// Backbone delays to test (in ms)
    pub delays: Vec<u32>,
    /// Runtime of the iperf clients (in seconds)
    pub runtime: u32,
    /// Stagger delay of the second client (in seconds)
    pub stagger_delay: u32,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            algorithms: DEFAULT_ALGORITHMS.iter().map(|s| s.to_string()).collect(),
            delays: DEFAULT_DELAYS.to_vec(),
            runtime: DEFAULT_RUNTIME,
            stagger_delay: DEFAULT_STAGGER_DELAY,
        }
    }
}

impl Sweep {
    /// Expand the sweep into the parameters of every single experiment, in execution order.
    /// All parameters are validated before any experiment is started.
    pub fn experiments(&self) -> Result<Vec<ExperimentParameters>> {
        let mut result = Vec::with_capacity(self.algorithms.len() * self.delays.len());
        for algorithm in self.algorithms.iter() {
            for delay in self.delays.iter() {
                result.push(ExperimentParameters::new(
                    algorithm.as_str(),
                    *delay,
                    self.runtime,
                    self.stagger_delay,
                )?);
            }
        }
        Ok(result)
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n - Algorithms: {:?}\n - delays: {:?}\n - Iperf runtime: {}\n - Iperf delayed start: {}",
            self.algorithms, self.delays, self.runtime, self.stagger_delay
        )
    }
}
