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

//! Module containing all error types of the runtime

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Main error type of the runtime
#[derive(Debug, Error)]
pub enum Error {
    /// An external process failed
    #[error("Process Error: {0}")]
    ProcessError(#[from] ProcessError),
    /// The emulated network could not be started or controlled
    #[error("Mininet Error: {0}")]
    MininetError(#[from] mininet::Error),
    /// The results of an experiment could not be processed
    #[error("{0}")]
    CcbenchError(#[from] ccbench::Error),
    /// IO Error
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// The report could not be serialized
    #[error("Json Error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors of external processes.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The process could not be started
    #[error("Cannot launch `{command}`: {source}")]
    LaunchFailed {
        /// Command line of the process
        command: String,
        /// Cause
        source: std::io::Error,
    },
    /// The output file of a process could not be created
    #[error("Cannot create the output file {} of `{command}`: {source}", .path.display())]
    OutputFile {
        /// Command line of the process
        command: String,
        /// Requested output file
        path: PathBuf,
        /// Cause
        source: std::io::Error,
    },
    /// The process exited with a non-zero status
    #[error("`{command}` exited with {status}")]
    ExitedNonZero {
        /// Command line of the process
        command: String,
        /// Exit status
        status: ExitStatus,
    },
    /// The process was asked to terminate, but did not exit in time, not even after SIGKILL.
    #[error("`{command}` (pid {pid}) is still running")]
    StillRunning {
        /// Command line of the process
        command: String,
        /// PID of the process
        pid: u32,
    },
    /// Waiting for the process failed
    #[error("Cannot wait for `{command}`: {source}")]
    Wait {
        /// Command line of the process
        command: String,
        /// Cause
        source: std::io::Error,
    },
    /// A signal could not be delivered
    #[error("Cannot send signal {signal} to `{command}`: {source}")]
    Signal {
        /// Command line of the process
        command: String,
        /// Signal number
        signal: i32,
        /// Cause
        source: std::io::Error,
    },
}
