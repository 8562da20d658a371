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

//! # Runtime System
//!
//! This system runs congestion control experiments inside an emulated dumbbell network, using
//! Mininet, the `tcp_probe` kernel module and iperf. For simplified usage, check the function
//! [`perform_sweep`].

#![deny(missing_docs, missing_debug_implementations)]

pub mod command;
pub mod config;
pub mod dumbbell;
mod error;
pub mod experiment;
pub mod iperf;
pub mod report;
pub mod smoke;
pub mod tcpprobe;

pub use error::{Error, ProcessError};

use config::RuntimeConfig;
use report::SweepReport;
use smoke::SmokeReport;

use ccbench::params::Sweep;
use log::*;

/// # Perform the sweep
///
/// Run every combination of algorithm and delay of the sweep, and write the congestion window plot
/// and the fairness plot of each into the output directory.
///
/// This function does the following for each combination:
///
/// 1. Start capturing the congestion window with `tcp_probe`
/// 2. Create the dumbbell network in Mininet, with the backbone delay of the experiment
/// 3. Start both iperf flows, the second one after the stagger delay, and wait until they finish
/// 4. Stop all processes and the network
/// 5. Parse the telemetry and render both plots
///
/// If `json_filename` is given, a summary of all runs is written to this file.
pub fn perform_sweep(
    sweep: &Sweep,
    cfg: &RuntimeConfig,
    json_filename: Option<String>,
) -> Result<SweepReport, Error> {
    let report = experiment::run_experiments(sweep, cfg)?;

    if let Some(json_filename) = json_filename {
        info!("Writing the summary to {}", json_filename);
        report.write_json(json_filename)?;
    }

    Ok(report)
}

/// # Perform the smoke test
///
/// Create the dumbbell network, check connectivity and bandwidth of both host pairs, and stop it
/// again.
pub fn perform_test(cfg: &RuntimeConfig) -> Result<SmokeReport, Error> {
    smoke::dumbbell_test(cfg)
}
