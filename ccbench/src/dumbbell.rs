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

//! # Dumbbell Topology
//!
//! ```text
//!  h1 --+                                 +-- h2
//!       |--- s3 === s1 ######## s2 === s4 ---|
//!  h3 --+                                 +-- h4
//! ```
//!
//! - `########`: backbone link, carrying the configured propagation delay. Both flows share it.
//! - `===`: access links, with a lower bandwidth than the host links.
//! - `---`: host links.
//!
//! All queue sizes are given in packets, and scale with the backbone delay, such that the buffers
//! stay proportional to the bandwidth-delay product.

use serde::Serialize;

/// Bandwidth of the backbone link in Mbit/s
pub const BACKBONE_BW: u32 = 984;
/// Queue size of the backbone link, per ms of delay
pub const BACKBONE_QUEUE_PER_MS: u32 = 82;
/// Bandwidth of the access links in Mbit/s
pub const ACCESS_BW: u32 = 252;
/// Queue size of the access links per ms of delay, before applying [`ACCESS_QUEUE_PERCENT`]
pub const ACCESS_QUEUE_PER_MS: u32 = 21;
/// Percentage of the access queue which is actually used
pub const ACCESS_QUEUE_PERCENT: u32 = 20;
/// Bandwidth of the host links in Mbit/s
pub const HOST_BW: u32 = 960;
/// Queue size of the host links, per ms of delay
pub const HOST_QUEUE_PER_MS: u32 = 80;

/// Shaping of a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkShape {
    /// Bandwidth in Mbit/s
    pub bw: u32,
    /// Propagation delay in ms
    pub delay: u32,
    /// Maximum queue size in packets
    pub max_queue_size: u32,
}

impl LinkShape {
    /// Shaping of the backbone link between `s1` and `s2`.
    pub fn backbone(delay: u32) -> Self {
        Self { bw: BACKBONE_BW, delay, max_queue_size: BACKBONE_QUEUE_PER_MS * delay }
    }

    /// Shaping of the access links (`s1 -- s3` and `s2 -- s4`). They carry no delay.
    pub fn access(delay: u32) -> Self {
        Self {
            bw: ACCESS_BW,
            delay: 0,
            max_queue_size: ACCESS_QUEUE_PER_MS * delay * ACCESS_QUEUE_PERCENT / 100,
        }
    }

    /// Shaping of the links connecting the hosts to `s3` and `s4`. They carry no delay.
    pub fn host(delay: u32) -> Self {
        Self { bw: HOST_BW, delay: 0, max_queue_size: HOST_QUEUE_PER_MS * delay }
    }

    /// Delay formatted for `tc`
    pub fn delay_str(&self) -> String {
        format!("{}ms", self.delay)
    }
}

/// Kind of link in the dumbbell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinkKind {
    /// Shared bottleneck between the two switch pairs
    Backbone,
    /// Last-mile link between a switch pair and its host pair
    Access,
    /// Link from a host to its switch
    Host,
}

/// A link of the dumbbell, connecting two named nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumbbellLink {
    /// First endpoint
    pub a: &'static str,
    /// Second endpoint
    pub b: &'static str,
    /// Kind of the link
    pub kind: LinkKind,
    /// Shaping of the link
    pub shape: LinkShape,
}

/// Declaration of the dumbbell topology for a given backbone delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dumbbell {
    /// Backbone delay in ms
    pub delay: u32,
    /// Names of all switches
    pub switches: Vec<&'static str>,
    /// Names of all hosts
    pub hosts: Vec<&'static str>,
    /// All links, in creation order
    pub links: Vec<DumbbellLink>,
}

impl Dumbbell {
    /// Declare the dumbbell with the given backbone delay (in ms)
    pub fn new(delay: u32) -> Self {
        let backbone = LinkShape::backbone(delay);
        let access = LinkShape::access(delay);
        let host = LinkShape::host(delay);
        let link = |a, b, kind, shape| DumbbellLink { a, b, kind, shape };
        Self {
            delay,
            switches: vec!["s1", "s2", "s3", "s4"],
            hosts: vec!["h1", "h2", "h3", "h4"],
            links: vec![
                link("s1", "s2", LinkKind::Backbone, backbone),
                link("s1", "s3", LinkKind::Access, access),
                link("s2", "s4", LinkKind::Access, access),
                link("s3", "h1", LinkKind::Host, host),
                link("s3", "h3", LinkKind::Host, host),
                link("s4", "h2", LinkKind::Host, host),
                link("s4", "h4", LinkKind::Host, host),
            ],
        }
    }

    /// Iterate over all links of a given kind
    pub fn links_of(&self, kind: LinkKind) -> impl Iterator<Item = &DumbbellLink> {
        self.links.iter().filter(move |l| l.kind == kind)
    }
}
