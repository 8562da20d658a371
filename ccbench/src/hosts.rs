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

//! # Hosts of the dumbbell
//!
//! The dumbbell topology contains exactly four hosts: two senders (`h1` and `h3`) on the left side
//! and two receivers (`h2` and `h4`) on the right side. Flows always go from `h1` to `h2`, and
//! from `h3` to `h4`.

use crate::{Error, Result};

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Role of a host in the dumbbell topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostRole {
    /// First sender
    H1,
    /// Receiver of the first flow
    H2,
    /// Second sender
    H3,
    /// Receiver of the second flow
    H4,
}

impl HostRole {
    /// All hosts, in the order they are created
    pub const ALL: [HostRole; 4] = [HostRole::H1, HostRole::H2, HostRole::H3, HostRole::H4];

    /// Name of the host in the emulated network
    pub fn name(&self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
        }
    }
}

impl fmt::Display for HostRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the two flow-initiating hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// `h1`, sending to `h2`, started first
    H1,
    /// `h3`, sending to `h4`, started after the stagger delay
    H3,
}

impl Sender {
    /// Both senders, in the order they are started
    pub const BOTH: [Sender; 2] = [Sender::H1, Sender::H3];

    /// Host of the sender
    pub fn host(&self) -> HostRole {
        match self {
            Self::H1 => HostRole::H1,
            Self::H3 => HostRole::H3,
        }
    }

    /// Host receiving the flow of this sender
    pub fn receiver(&self) -> HostRole {
        match self {
            Self::H1 => HostRole::H2,
            Self::H3 => HostRole::H4,
        }
    }

    /// Label of the flow, used in file names (e.g. `h1-h2`)
    pub fn pair_label(&self) -> String {
        format!("{}-{}", self.host(), self.receiver())
    }

    /// Label used in plot legends
    pub fn legend(&self) -> &'static str {
        match self {
            Self::H1 => "Source Host 1 (h1)",
            Self::H3 => "Source Host 2 (h3)",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host(), f)
    }
}

/// Value stored for each of the two senders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerSender<T> {
    /// Value of `h1`
    pub h1: T,
    /// Value of `h3`
    pub h3: T,
}

impl<T> PerSender<T> {
    /// Create a new pair
    pub fn new(h1: T, h3: T) -> Self {
        Self { h1, h3 }
    }

    /// Get the value of a sender
    pub fn get(&self, sender: Sender) -> &T {
        match sender {
            Sender::H1 => &self.h1,
            Sender::H3 => &self.h3,
        }
    }

    /// Get the value of a sender mutably
    pub fn get_mut(&mut self, sender: Sender) -> &mut T {
        match sender {
            Sender::H1 => &mut self.h1,
            Sender::H3 => &mut self.h3,
        }
    }

    /// Iterate over both values, together with the sender
    pub fn iter(&self) -> impl Iterator<Item = (Sender, &T)> {
        Sender::BOTH.iter().copied().map(move |s| (s, self.get(s)))
    }

    /// Transform both values
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> PerSender<U> {
        PerSender { h1: f(&self.h1), h3: f(&self.h3) }
    }
}

/// Addresses of all four hosts, resolved once the emulated network is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAddresses {
    addrs: HashMap<HostRole, String>,
}

impl HostAddresses {
    /// Create the address map. Every host must have an address.
    pub fn new(addrs: HashMap<HostRole, String>) -> Result<Self> {
        if let Some(missing) = HostRole::ALL.iter().find(|r| !addrs.contains_key(r)) {
            return Err(Error::MissingHost(*missing));
        }
        Ok(Self { addrs })
    }

    /// Address of a host
    pub fn get(&self, role: HostRole) -> &str {
        // all roles are checked in `new`
        self.addrs[&role].as_str()
    }

    /// Address of a sender
    pub fn sender(&self, sender: Sender) -> &str {
        self.get(sender.host())
    }
}

impl fmt::Display for HostAddresses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = HostRole::ALL
            .iter()
            .map(|r| format!("'{}': '{}'", r, self.get(*r)))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
