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

//! # Experiment Driver
//!
//! Runs every combination of a [`Sweep`] one after the other. Each experiment goes through the
//! following phases:
//!
//! 1. Kill stale capture processes, reload `tcp_probe` and start the capture.
//! 2. Start the emulated dumbbell.
//! 3. Start iperf servers on both receivers, give them time to listen, then start the first
//!    client, and after the stagger delay the second client (see [`traffic_plan`]).
//! 4. Wait for both clients to finish.
//! 5. Stop the servers and the capture, clean up the capture again, and stop the network.
//! 6. Parse both telemetry streams and render the plots.
//!
//! The network and all processes are released before the next experiment starts, also when an
//! experiment fails. Only the files remain.

use crate::command::ManagedProcess;
use crate::config::RuntimeConfig;
use crate::dumbbell::DumbbellNetwork;
use crate::iperf;
use crate::report::{RunReport, SweepReport};
use crate::tcpprobe;
use crate::Error;

use ccbench::hosts::{HostAddresses, Sender};
use ccbench::naming::ArtifactNames;
use ccbench::params::{ExperimentParameters, Sweep};
use ccbench::results::ExperimentData;

use log::*;
use std::thread::sleep;
use std::time::Duration;

/// Run all experiments of the sweep. The first failing experiment stops the sweep.
pub fn run_experiments(sweep: &Sweep, cfg: &RuntimeConfig) -> Result<SweepReport, Error> {
    info!("*** Settings: {}", sweep);
    let experiments = sweep.experiments()?;
    std::fs::create_dir_all(&cfg.output_dir)?;

    let mut runs = Vec::with_capacity(experiments.len());
    for params in experiments.iter() {
        runs.push(run_experiment(params, cfg)?);
    }
    Ok(SweepReport { sweep: sweep.clone(), runs })
}

/// Run a single experiment, and render its plots.
pub fn run_experiment(
    params: &ExperimentParameters,
    cfg: &RuntimeConfig,
) -> Result<RunReport, Error> {
    info!("*** Running the experiment with {}", params);
    let names = cfg.names(params);

    // capture
    tcpprobe::clean_capture_procs(cfg);
    tcpprobe::reset_module(cfg);
    let mut capture = tcpprobe::start_capture(cfg, names.tcpprobe())?;

    // network
    let net = match DumbbellNetwork::start(params.delay, cfg) {
        Ok(net) => net,
        Err(e) => {
            stop_process(&mut capture, cfg.terminate_grace);
            tcpprobe::clean_capture_procs(cfg);
            return Err(e);
        }
    };
    let addrs = net.addresses().clone();
    info!("Host addresses: {}", addrs);

    // traffic
    let traffic = generate_traffic(&net, &addrs, params, &names, cfg);

    // teardown
    info!("*** Stopping the capture...");
    stop_process(&mut capture, cfg.terminate_grace);
    tcpprobe::clean_capture_procs(cfg);
    if let Err(e) = net.stop() {
        error!("Cannot stop the network: {}", e);
    }
    traffic?;

    // post-processing
    let data = ExperimentData::load(&names, &addrs)?;
    data.render(&names, &params.algorithm, params.delay)?;
    if cfg.export_csv {
        data.export_csv(&names)?;
    }
    info!("*** Experiment with {} done", params);

    Ok(RunReport::new(params, &names, &data))
}

/// One step of the traffic phase of an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficStep {
    /// Start the iperf server on the receiver of the sender
    StartServer(Sender),
    /// Give the servers time to listen
    AwaitServers,
    /// Start the iperf client on the sender
    StartClient(Sender),
    /// Wait for the stagger delay
    Stagger,
    /// Wait for all clients to finish
    AwaitClients,
}

/// Order of the traffic phase: both servers, the settle time, the first client, the stagger
/// delay, the second client, and finally the wait for both clients.
pub fn traffic_plan() -> Vec<TrafficStep> {
    let mut plan: Vec<TrafficStep> =
        Sender::BOTH.iter().map(|s| TrafficStep::StartServer(*s)).collect();
    plan.push(TrafficStep::AwaitServers);
    for (i, sender) in Sender::BOTH.iter().enumerate() {
        if i > 0 {
            plan.push(TrafficStep::Stagger);
        }
        plan.push(TrafficStep::StartClient(*sender));
    }
    plan.push(TrafficStep::AwaitClients);
    plan
}

/// Processes of the traffic phase. Processes still running when this is dropped are terminated.
struct Traffic<'a> {
    net: &'a DumbbellNetwork,
    addrs: &'a HostAddresses,
    params: &'a ExperimentParameters,
    names: &'a ArtifactNames,
    cfg: &'a RuntimeConfig,
    servers: Vec<ManagedProcess>,
    clients: Vec<ManagedProcess>,
}

impl Traffic<'_> {
    fn execute(&mut self, step: TrafficStep) -> Result<(), Error> {
        match step {
            TrafficStep::StartServer(sender) => {
                info!("*** Starting the iperf server on {}...", sender.receiver());
                let cmd = self.net.iperf(sender.receiver())?.args(iperf::server_args());
                self.servers.push(cmd.spawn()?);
            }
            TrafficStep::AwaitServers => {
                debug!("Waiting {:?} for the iperf servers to listen", self.cfg.server_settle);
                sleep(self.cfg.server_settle);
            }
            TrafficStep::StartClient(sender) => {
                info!("*** Starting the iperf client {}...", sender.pair_label());
                let cmd = self
                    .net
                    .iperf(sender.host())?
                    .args(iperf::client_args(self.addrs.get(sender.receiver()), self.params))
                    .stdout_to(self.names.iperf(sender));
                self.clients.push(cmd.spawn()?);
            }
            TrafficStep::Stagger => {
                info!("Waiting {}s before starting the next flow", self.params.stagger_delay);
                sleep(self.params.stagger());
            }
            TrafficStep::AwaitClients => {
                info!("*** Waiting for the iperf clients to finish...");
                let results: Vec<_> = self.clients.iter_mut().map(|c| c.wait_success()).collect();
                for r in results {
                    r?;
                }
            }
        }
        Ok(())
    }
}

/// Execute the [`traffic_plan`], and stop the servers again.
fn generate_traffic(
    net: &DumbbellNetwork,
    addrs: &HostAddresses,
    params: &ExperimentParameters,
    names: &ArtifactNames,
    cfg: &RuntimeConfig,
) -> Result<(), Error> {
    let mut traffic = Traffic {
        net,
        addrs,
        params,
        names,
        cfg,
        servers: Vec::with_capacity(2),
        clients: Vec::with_capacity(2),
    };
    let result = traffic_plan().into_iter().try_for_each(|step| traffic.execute(step));

    info!("*** Stopping the iperf servers...");
    for server in traffic.servers.iter_mut() {
        stop_process(server, cfg.terminate_grace);
    }
    result
}

/// Terminate a process and wait for it. Errors are only logged.
fn stop_process(process: &mut ManagedProcess, grace: Duration) {
    if let Err(e) = process.terminate_and_wait(grace) {
        error!("{}", e);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invalid_sweep_starts_nothing() {
        let dir = std::env::temp_dir().join(format!("ccbench_invalid_{}", std::process::id()));
        let cfg = RuntimeConfig { output_dir: dir.clone(), ..Default::default() };
        let sweep = Sweep { runtime: 0, ..Default::default() };
        match run_experiments(&sweep, &cfg) {
            Err(Error::CcbenchError(ccbench::Error::InvalidParameters(_))) => {}
            r => panic!("unexpected result: {:?}", r),
        }
        // validation happens before anything is written
        assert!(!dir.exists());
    }

    #[test]
    fn servers_listen_before_clients() {
        let plan = traffic_plan();
        let settle = plan.iter().position(|s| *s == TrafficStep::AwaitServers).unwrap();
        let first_client =
            plan.iter().position(|s| matches!(s, TrafficStep::StartClient(_))).unwrap();
        assert!(settle < first_client);
        for sender in Sender::BOTH.iter() {
            let server = plan.iter().position(|s| *s == TrafficStep::StartServer(*sender)).unwrap();
            assert!(server < settle);
        }
    }

    #[test]
    fn clients_are_staggered() {
        use TrafficStep::*;
        assert_eq!(
            traffic_plan(),
            vec![
                StartServer(Sender::H1),
                StartServer(Sender::H3),
                AwaitServers,
                StartClient(Sender::H1),
                Stagger,
                StartClient(Sender::H3),
                AwaitClients,
            ]
        );
    }

    #[test]
    fn empty_sweep() {
        let dir = std::env::temp_dir().join(format!("ccbench_empty_{}", std::process::id()));
        let cfg = RuntimeConfig { output_dir: dir.clone(), ..Default::default() };
        let sweep = Sweep { algorithms: Vec::new(), ..Default::default() };
        let report = run_experiments(&sweep, &cfg).unwrap();
        assert!(report.runs.is_empty());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
