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

//! # Emulated Dumbbell Network
//!
//! Session object of the emulated dumbbell. The network is started when the session is created,
//! and stopped when it is dropped, or explicitly with [`DumbbellNetwork::stop`].

use crate::command::CommandSpec;
use crate::config::RuntimeConfig;
use crate::Error;

use ccbench::dumbbell::{Dumbbell, LinkShape};
use ccbench::hosts::{HostAddresses, HostRole};
use mininet::{LinkParams, MininetSession, PingResult, Topology};

use log::*;
use std::collections::HashMap;
use std::time::Duration;

/// Translate the declaration of the dumbbell into a Mininet topology, with HTB shaping on every
/// link.
pub fn dumbbell_topology(dumbbell: &Dumbbell) -> Topology {
    let mut topo = Topology::new();
    for switch in dumbbell.switches.iter() {
        topo.add_switch(*switch);
    }
    for host in dumbbell.hosts.iter() {
        topo.add_host(*host);
    }
    for link in dumbbell.links.iter() {
        topo.add_link(link.a, link.b, link_params(&link.shape));
    }
    topo
}

fn link_params(shape: &LinkShape) -> LinkParams {
    LinkParams {
        bw: Some(shape.bw as f64),
        delay: Some(shape.delay_str()),
        max_queue_size: Some(shape.max_queue_size),
        use_htb: true,
    }
}

/// A running dumbbell network
#[derive(Debug)]
pub struct DumbbellNetwork {
    session: MininetSession,
    addrs: HostAddresses,
    sudo: bool,
    iperf: String,
    grace: Duration,
}

impl DumbbellNetwork {
    /// Build and start the dumbbell with the given backbone delay, and resolve the addresses of
    /// all hosts.
    pub fn start(delay: u32, cfg: &RuntimeConfig) -> Result<Self, Error> {
        info!("*** Creating the dumbbell network with a {}ms backbone...", delay);
        let topo = dumbbell_topology(&Dumbbell::new(delay));
        // if resolving fails, dropping the session stops the network again
        let session = MininetSession::start(&topo, &cfg.session_options())?;

        let mut addrs = HashMap::new();
        for role in HostRole::ALL.iter() {
            addrs.insert(*role, session.host(role.name())?.ip.clone());
        }
        let addrs = HostAddresses::new(addrs)?;
        debug!("Host addresses: {}", addrs);

        Ok(Self {
            session,
            addrs,
            sudo: cfg.sudo,
            iperf: cfg.iperf.clone(),
            grace: cfg.terminate_grace,
        })
    }

    /// Addresses of all hosts
    pub fn addresses(&self) -> &HostAddresses {
        &self.addrs
    }

    /// Command which executes `program` on a host
    pub fn command(&self, host: HostRole, program: &str) -> Result<CommandSpec, Error> {
        let prefix = self.session.exec_prefix(host.name())?;
        Ok(CommandSpec::new(program)
            .in_namespace(prefix)
            .sudo(self.sudo)
            .terminate_grace(self.grace))
    }

    /// Command which executes iperf on a host
    pub fn iperf(&self, host: HostRole) -> Result<CommandSpec, Error> {
        self.command(host, &self.iperf)
    }

    /// Send a single ping from `src` to `dst`
    pub fn ping(&self, src: HostRole, dst: HostRole) -> Result<PingResult, Error> {
        Ok(self.session.ping_full(src.name(), dst.name())?)
    }

    /// Log the connections of every host
    pub fn dump_connections(&self) {
        for host in self.session.hosts() {
            info!("{}", host);
        }
    }

    /// Stop the emulated network
    pub fn stop(self) -> Result<(), Error> {
        Ok(self.session.stop()?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mininet::LinkSpec;

    #[test]
    fn topology() {
        let topo = dumbbell_topology(&Dumbbell::new(21));
        assert_eq!(topo.switches, vec!["s1", "s2", "s3", "s4"]);
        assert_eq!(topo.hosts, vec!["h1", "h2", "h3", "h4"]);
        assert_eq!(topo.links.len(), 7);
        assert!(topo.links.iter().all(|l| l.params.use_htb));
        assert_eq!(
            topo.links[0],
            LinkSpec {
                a: "s1".into(),
                b: "s2".into(),
                params: LinkParams {
                    bw: Some(984.0),
                    delay: Some("21ms".into()),
                    max_queue_size: Some(1722),
                    use_htb: true,
                },
            }
        );
        assert_eq!(topo.links[1].params.max_queue_size, Some(88));
        assert_eq!(topo.links[1].params.delay.as_deref(), Some("0ms"));
        assert_eq!(topo.links[6].params.bw, Some(960.0));
    }

    #[test]
    fn start_network() {
        // requires root and Mininet
        if !crate::config::is_root() {
            return; // skip the test
        }
        let cfg = RuntimeConfig::default();
        let net = match DumbbellNetwork::start(21, &cfg) {
            Ok(net) => net,
            Err(_) => return, // skip the test
        };
        assert_eq!(net.addresses().get(HostRole::H1), "10.0.0.1");
        let ping = net.ping(HostRole::H1, HostRole::H2).unwrap();
        assert_eq!(ping.sent, 1);
        net.stop().unwrap();
    }
}
