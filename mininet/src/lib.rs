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

//! # Mininet Session API
//!
//! This is a very simple crate to drive the Mininet emulator from Rust. Mininet only exposes a
//! Python API, so a small helper program is started with the Python interpreter. It builds the
//! topology, starts the network and reports the address and namespace of every host. Afterwards,
//! commands can be executed inside the network namespace of a host using `mnexec`, exactly as
//! Mininet does it itself.
//!
//! ```no_run
//! use mininet::{LinkParams, MininetSession, SessionOptions, Topology};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut topo = Topology::new();
//!     topo.add_switch("s1");
//!     topo.add_host("h1");
//!     topo.add_host("h2");
//!     topo.add_link("s1", "h1", LinkParams::default());
//!     topo.add_link("s1", "h2", LinkParams::default());
//!
//!     // build and start the network
//!     let session = MininetSession::start(&topo, &SessionOptions::default())?;
//!
//!     let result = session.ping_full("h1", "h2")?;
//!     println!("h1 -> h2: {:?}", result);
//!
//!     session.stop()?;
//!     Ok(())
//! }
//! ```
#![deny(missing_docs)]

mod session;
mod types;
pub use session::{MininetSession, SessionOptions};
pub use types::*;

use thiserror::Error;

/// # Mininet Error type
#[derive(Debug, Error)]
pub enum Error {
    /// IO Error while talking to the helper process
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// Cannot serialize the request or deserialize the response
    #[error("Cannot parse JSON message: {0}")]
    JsonError(#[from] serde_json::error::Error),
    /// The helper process could not be started
    #[error("Cannot start the Mininet helper ({program}): {source}")]
    LaunchError {
        /// Program that was executed
        program: String,
        /// Cause of the error
        source: std::io::Error,
    },
    /// Mininet reported an error
    #[error("Mininet Error: {0}")]
    MininetError(String),
    /// The helper terminated before sending an answer
    #[error("The Mininet helper terminated unexpectedly")]
    HelperTerminated,
    /// The requested host is not part of the network
    #[error("Unknown host: {0}")]
    UnknownHost(String),
    /// The output of a command could not be interpreted
    #[error("Cannot parse the output of {command}: {output}")]
    UnexpectedOutput {
        /// Command which was executed
        command: String,
        /// Output that was received
        output: String,
    },
}

/// Mininet Result type
type Result<T> = core::result::Result<T, Error>;
