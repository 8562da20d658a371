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

//! # Artifact names
//!
//! All files of an experiment are named deterministically from the algorithm and the delay, such
//! that runs with different parameters never overwrite each other.

use crate::hosts::Sender;

use std::path::{Path, PathBuf};

/// Names of all files written for a single (algorithm, delay) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    dir: PathBuf,
    algorithm: String,
    delay: u32,
}

impl ArtifactNames {
    /// Create the names for the given algorithm and delay, placed in `dir`.
    pub fn new(dir: impl AsRef<Path>, algorithm: impl Into<String>, delay: u32) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), algorithm: algorithm.into(), delay }
    }

    /// Directory in which all artifacts are placed
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Capture file of `tcp_probe`, e.g. `tcpprobe_cubic_21ms.txt`
    pub fn tcpprobe(&self) -> PathBuf {
        self.dir.join(format!("tcpprobe_{}_{}ms.txt", self.algorithm, self.delay))
    }

    /// Output file of the iperf client of a sender, e.g. `iperf_cubic_h1-h2_21ms.txt`
    pub fn iperf(&self, sender: Sender) -> PathBuf {
        self.dir.join(format!(
            "iperf_{}_{}_{}ms.txt",
            self.algorithm,
            sender.pair_label(),
            self.delay
        ))
    }

    /// Congestion window plot, e.g. `cwnd_vs_time_cubic_21ms.png`
    pub fn cwnd_plot(&self) -> PathBuf {
        self.dir.join(format!("cwnd_vs_time_{}_{}ms.png", self.algorithm, self.delay))
    }

    /// Fairness (throughput) plot, e.g. `fairness_graph_cubic_21ms.png`
    pub fn fairness_plot(&self) -> PathBuf {
        self.dir.join(format!("fairness_graph_{}_{}ms.png", self.algorithm, self.delay))
    }

    /// All files written by the external processes
    pub fn raw_files(&self) -> Vec<PathBuf> {
        vec![self.tcpprobe(), self.iperf(Sender::H1), self.iperf(Sender::H3)]
    }

    /// Both plots
    pub fn plots(&self) -> Vec<PathBuf> {
        vec![self.cwnd_plot(), self.fairness_plot()]
    }
}

/// Path of the CSV export that belongs to a plot (same name, `.csv` extension)
pub fn csv_for(plot: &Path) -> PathBuf {
    plot.with_extension("csv")
}
