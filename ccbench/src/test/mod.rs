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

#[cfg(test)]
mod test_dumbbell;
#[cfg(test)]
mod test_params;
#[cfg(test)]
mod test_parser;

#[cfg(test)]
use crate::hosts::{HostAddresses, HostRole::*};
#[cfg(test)]
use std::path::PathBuf;

/// Addresses as assigned by Mininet to the hosts of the dumbbell
#[cfg(test)]
pub(crate) fn example_addrs() -> HostAddresses {
    HostAddresses::new(maplit::hashmap! {
        H1 => "10.0.0.1".to_string(),
        H2 => "10.0.0.2".to_string(),
        H3 => "10.0.0.3".to_string(),
        H4 => "10.0.0.4".to_string(),
    })
    .unwrap()
}

/// Create an empty scratch directory, unique for this test process.
#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ccbench_{}_{}", name, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
