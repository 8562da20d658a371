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

//! Configuration of the runtime

use ccbench::naming::ArtifactNames;
use ccbench::params::ExperimentParameters;
use mininet::SessionOptions;

use std::path::PathBuf;
use std::time::Duration;

/// Default time a process gets to exit after SIGTERM, before it is killed.
pub const DEFAULT_TERMINATE_GRACE: Duration = Duration::from_secs(5);
/// Default time the iperf servers get to listen before the first client connects.
pub const DEFAULT_SERVER_SETTLE: Duration = Duration::from_secs(1);

/// Everything the runtime needs to know about its environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Directory in which all telemetry files and plots are written
    pub output_dir: PathBuf,
    /// Execute all privileged commands with `sudo`
    pub sudo: bool,
    /// Python interpreter with Mininet installed
    pub python: String,
    /// The `mnexec` utility of Mininet
    pub mnexec: String,
    /// The iperf (version 2) binary
    pub iperf: String,
    /// Log level of Mininet (`debug`, `info`, `output`, `warning`, `error` or `critical`)
    pub log_level: String,
    /// Time a process gets to exit after SIGTERM
    pub terminate_grace: Duration,
    /// Time the iperf servers get to listen before the first client connects
    pub server_settle: Duration,
    /// Export the parsed series as CSV next to the plots
    pub export_csv: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            sudo: !is_root(),
            python: String::from("python3"),
            mnexec: String::from("mnexec"),
            iperf: String::from("iperf"),
            log_level: String::from("info"),
            terminate_grace: DEFAULT_TERMINATE_GRACE,
            server_settle: DEFAULT_SERVER_SETTLE,
            export_csv: false,
        }
    }
}

impl RuntimeConfig {
    /// Options for the Mininet session
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            python: self.python.clone(),
            mnexec: self.mnexec.clone(),
            sudo: self.sudo,
            log_level: self.log_level.clone(),
        }
    }

    /// Names of all files of an experiment, placed in the output directory
    pub fn names(&self, params: &ExperimentParameters) -> ArtifactNames {
        ArtifactNames::new(&self.output_dir, params.algorithm.as_str(), params.delay)
    }
}

/// Returns true if the effective user is root
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
