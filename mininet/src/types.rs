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

//! # Mininet Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Description of a topology, which is sent to the helper to build a `mininet.topo.Topo`.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct Topology {
    /// Names of all switches
    pub switches: Vec<String>,
    /// Names of all hosts
    pub hosts: Vec<String>,
    /// All links
    pub links: Vec<LinkSpec>,
}

impl Topology {
    /// Create an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a switch
    pub fn add_switch(&mut self, name: impl Into<String>) {
        self.switches.push(name.into());
    }

    /// Add a host
    pub fn add_host(&mut self, name: impl Into<String>) {
        self.hosts.push(name.into());
    }

    /// Add a link between two nodes, which are either hosts or switches.
    pub fn add_link(&mut self, a: impl Into<String>, b: impl Into<String>, params: LinkParams) {
        self.links.push(LinkSpec { a: a.into(), b: b.into(), params });
    }

    /// Returns true if the name is a known host or switch
    pub fn contains_node(&self, name: &str) -> bool {
        self.hosts.iter().chain(self.switches.iter()).any(|n| n == name)
    }
}

/// A single link of the topology
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LinkSpec {
    /// First endpoint
    pub a: String,
    /// Second endpoint
    pub b: String,
    /// Traffic control parameters of the link
    pub params: LinkParams,
}

/// Traffic control parameters of a `TCLink`. Fields which are `None` are not passed to Mininet.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct LinkParams {
    /// Bandwidth in Mbit/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bw: Option<f64>,
    /// Propagation delay, formatted for `tc` (e.g. `21ms`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    /// Maximum queue size in packets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_queue_size: Option<u32>,
    /// Use HTB instead of TBF for rate limiting
    pub use_htb: bool,
}

/// Information about a host, reported by the helper once the network is running.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HostInfo {
    /// Name of the host
    pub name: String,
    /// IP address of the default interface
    pub ip: String,
    /// PID of the shell which owns the network namespace of the host
    pub pid: i32,
    /// All connections of the host
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for c in self.connections.iter() {
            write!(f, " {}", c)?;
        }
        Ok(())
    }
}

/// Connection from an interface of a node to the interface of its peer
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Connection {
    /// Local interface name
    pub intf: String,
    /// Interface name on the other end of the link
    pub peer: String,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.intf, self.peer)
    }
}

/// Result of a single ping, as reported by `pingFull` in Mininet
#[derive(Debug, Clone, PartialEq)]
pub struct PingResult {
    /// Number of packets sent
    pub sent: u32,
    /// Number of packets received
    pub received: u32,
    /// Round trip times `(min, avg, max, mdev)` in milliseconds, if any packet was received
    pub rtt_ms: Option<(f64, f64, f64, f64)>,
}

/// First message sent to the helper
#[derive(Debug, Serialize)]
pub(crate) struct HelperRequest<'a> {
    pub log_level: &'a str,
    #[serde(flatten)]
    pub topo: &'a Topology,
}

/// Messages sent back from the helper, one JSON object per line.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum HelperResponse {
    Ready { hosts: Vec<HostInfo> },
    Stopped,
    Error { message: String },
}
