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

//! Summary of a sweep, which can be stored as JSON.

use crate::Error;

use ccbench::hosts::{PerSender, Sender};
use ccbench::naming::ArtifactNames;
use ccbench::params::{ExperimentParameters, Sweep};
use ccbench::results::ExperimentData;
use ccbench::telemetry::ThroughputSample;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Summary of a single experiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Parameters of the experiment
    pub parameters: ExperimentParameters,
    /// Capture file of `tcp_probe`
    pub tcpprobe_file: PathBuf,
    /// Output files of both iperf clients
    pub iperf_files: PerSender<PathBuf>,
    /// Rendered plots
    pub plots: Vec<PathBuf>,
    /// Number of congestion window samples per sender
    pub cwnd_samples: PerSender<usize>,
    /// Number of throughput samples per sender
    pub throughput_samples: PerSender<usize>,
    /// Throughput samples that were moved by one second, per sender
    pub collisions: PerSender<usize>,
    /// Throughput samples that preceded their predecessor, per sender
    pub out_of_order: PerSender<usize>,
    /// Summary entry written by iperf at the end of the run
    pub iperf_summary: PerSender<Option<ThroughputSample>>,
}

impl RunReport {
    /// Summarize the parsed data of an experiment
    pub fn new(params: &ExperimentParameters, names: &ArtifactNames, data: &ExperimentData) -> Self {
        Self {
            parameters: params.clone(),
            tcpprobe_file: names.tcpprobe(),
            iperf_files: PerSender::new(names.iperf(Sender::H1), names.iperf(Sender::H3)),
            plots: names.plots(),
            cwnd_samples: data.cwnd.map(|s| s.len()),
            throughput_samples: data.throughput.map(|t| t.samples.len()),
            collisions: data.throughput.map(|t| t.collisions),
            out_of_order: data.throughput.map(|t| t.out_of_order),
            iperf_summary: data.throughput.map(|t| t.summary),
        }
    }
}

/// Summary of an entire sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    /// The sweep that was performed
    pub sweep: Sweep,
    /// All experiments, in execution order
    pub runs: Vec<RunReport>,
}

impl SweepReport {
    /// Write the report as JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let data_string = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data_string)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ccbench::hosts::HostRole::*;
    use ccbench::hosts::HostAddresses;
    use ccbench::parser::{parse_iperf, ThroughputTrace, TimeOrigin};
    use ccbench::telemetry::CwndSample;
    use maplit::hashmap;

    fn trace(input: &str, addr: &str) -> ThroughputTrace {
        parse_iperf(input.as_bytes(), addr, TimeOrigin::FirstSample).unwrap()
    }

    #[test]
    fn run_report() {
        let addrs = HostAddresses::new(hashmap! {
            H1 => "10.0.0.1".to_string(),
            H2 => "10.0.0.2".to_string(),
            H3 => "10.0.0.3".to_string(),
            H4 => "10.0.0.4".to_string(),
        })
        .unwrap();
        let data = ExperimentData {
            cwnd: PerSender::new(
                vec![CwndSample { time: 0.0, cwnd: 10 }, CwndSample { time: 0.1, cwnd: 12 }],
                vec![CwndSample { time: 0.0, cwnd: 10 }],
            ),
            throughput: PerSender::new(
                trace(
                    "20210105123456,10.0.0.1,1,10.0.0.2,5001,3,0.0-1.0,1,1000000\n\
                     20210105123456,10.0.0.1,1,10.0.0.2,5001,3,0.0-1.0,1,1000000\n",
                    addrs.get(H1),
                ),
                trace(
                    "20210105123756,10.0.0.3,1,10.0.0.4,5001,3,0.0-1.0,1,1000000\n\
                     20210105123754,10.0.0.3,1,10.0.0.4,5001,3,1.0-2.0,1,1000000\n\
                     20210105123800,10.0.0.3,1,10.0.0.4,5001,3,0.0-2.0,2,1000000\n",
                    addrs.get(H3),
                ),
            ),
        };
        let params = ExperimentParameters::new("reno", 162, 10, 2).unwrap();
        let names = ArtifactNames::new("out", "reno", 162);
        let report = RunReport::new(&params, &names, &data);

        assert_eq!(report.cwnd_samples, PerSender::new(2, 1));
        assert_eq!(report.throughput_samples, PerSender::new(1, 2));
        assert_eq!(report.collisions, PerSender::new(1, 0));
        assert_eq!(report.out_of_order, PerSender::new(0, 1));
        assert_eq!(report.iperf_summary.h1, Some(ThroughputSample { time: 1.0, mbps: 1.0 }));
        assert_eq!(report.iperf_files.h3, PathBuf::from("out/iperf_reno_h3-h4_162ms.txt"));

        let sweep = SweepReport { sweep: Sweep::default(), runs: vec![report] };
        let json: serde_json::Value = serde_json::to_value(&sweep).unwrap();
        assert_eq!(json["runs"][0]["parameters"]["algorithm"], "reno");
        assert_eq!(json["runs"][0]["cwnd_samples"]["h1"], 2);
        assert_eq!(json["runs"][0]["out_of_order"]["h3"], 1);
        assert_eq!(json["sweep"]["delays"], serde_json::json!([21, 81, 162]));
    }
}
