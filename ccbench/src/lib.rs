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

#![deny(missing_docs)]

//! # CCBench: TCP Congestion Control Experiments
//! This library contains everything needed to evaluate an experiment with two competing TCP flows
//! in a dumbbell topology: the declaration of the topology, the experiment parameters, the parsers
//! for the telemetry written by `tcp_probe` and iperf, and the plots.
//!
//! Running the experiment itself (starting the emulated network, the capture and the traffic
//! generators) is done in `ccbench_runtime`.
//!
//! ## Structure
//!
//! - **[`Parameters`](params)**: [`ExperimentParameters`](params::ExperimentParameters) of a single
//!   run, and the [`Sweep`](params::Sweep) over all algorithms and delays.
//!
//! - **[`Hosts`](hosts)**: Roles of the four hosts, and their resolved
//!   [addresses](hosts::HostAddresses).
//!
//! - **[`Dumbbell`](dumbbell)**: Declaration of the topology, including the shaping of every link,
//!   scaled by the backbone delay.
//!
//! - **[`Parser`](parser)**: Parsers for both telemetry streams, which normalize the time of each
//!   sample.
//!
//! - **[`Plot`](plot)**: Rendering of the congestion window plot and the fairness plot.
//!
//! - **[`Results`](results)**: Post-processing of a finished run, combining all of the above.
//!
//! ## Usage
//!
//! ```no_run
//! use ccbench::hosts::{HostAddresses, HostRole};
//! use ccbench::naming::ArtifactNames;
//! use ccbench::results::ExperimentData;
//! use std::collections::HashMap;
//!
//! fn main() -> Result<(), ccbench::Error> {
//!     let addrs: HashMap<HostRole, String> = HostRole::ALL
//!         .iter()
//!         .enumerate()
//!         .map(|(i, r)| (*r, format!("10.0.0.{}", i + 1)))
//!         .collect();
//!     let addrs = HostAddresses::new(addrs)?;
//!
//!     // files of a previous run
//!     let names = ArtifactNames::new(".", "cubic", 21);
//!     let data = ExperimentData::load(&names, &addrs)?;
//!     data.render(&names, "cubic", 21)?;
//!     Ok(())
//! }
//! ```

mod test;

pub mod dumbbell;
mod error;
pub mod export;
pub mod hosts;
pub mod naming;
pub mod params;
pub mod parser;
pub mod plot;
pub mod results;
pub mod telemetry;

pub use error::Error;

/// Result type of this crate
pub type Result<T> = std::result::Result<T, Error>;
