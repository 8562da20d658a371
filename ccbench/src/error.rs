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

//! Module containing all error types

use crate::hosts::HostRole;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// A telemetry file, which should have been written by an external process, does not exist.
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),
    /// IO Error
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// A record of a telemetry file cannot be parsed
    #[error("Malformed record: {0}")]
    CsvError(#[from] csv::Error),
    /// The compact timestamp of iperf cannot be parsed
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    /// The trace of a sender does not contain a single sample
    #[error("No samples from {addr} found in {}", .file.display())]
    EmptyTrace {
        /// Address which was searched for
        addr: String,
        /// File which was parsed
        file: PathBuf,
    },
    /// The address of a host was not resolved
    #[error("No address known for host {0}")]
    MissingHost(HostRole),
    /// The experiment parameters are invalid
    #[error("Invalid experiment parameters: {0}")]
    InvalidParameters(String),
    /// Error while rendering a plot
    #[error("Plot Error: {0}")]
    PlotError(String),
}
