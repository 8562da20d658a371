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

use ccbench::params::{
    Sweep, DEFAULT_ALGORITHMS, DEFAULT_DELAYS, DEFAULT_RUNTIME, DEFAULT_STAGGER_DELAY,
};
use ccbench_runtime::config::{is_root, RuntimeConfig};
use ccbench_runtime::{perform_sweep, perform_test};

use clap::{Parser, ValueEnum};
use log::*;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    // run clap
    let args = CommandLineArguments::parse();

    // initialize the env logger
    init_logger(args.log_level);

    let cfg = args.runtime_config();

    if args.run_test {
        let report = perform_test(&cfg)?;
        info!(
            "Smoke test done: {}/{} pings answered, bandwidth: h1-h2: {}, h3-h4: {}",
            report.pings_received,
            report.pings_sent,
            fmt_bandwidth(report.bandwidth.h1),
            fmt_bandwidth(report.bandwidth.h3),
        );
    } else {
        let report = perform_sweep(&args.sweep(), &cfg, args.json_summary.clone())?;
        for run in report.runs.iter() {
            info!(
                "{}:\n    {}",
                run.parameters,
                run.plots.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join("\n    ")
            );
        }
    }

    Ok(())
}

fn init_logger(level: LogLevel) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.parse_filters(level.filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn fmt_bandwidth(bw: Option<f64>) -> String {
    bw.map(|bw| format!("{:.2} Mbits/sec", bw)).unwrap_or_else(|| "unknown".to_string())
}

#[derive(Parser, Debug)]
#[command(
    name = "TCP Congestion Control Experiments",
    author = "Tibor Schneider",
    about = "Runs TCP congestion control experiments in an emulated dumbbell network"
)]
struct CommandLineArguments {
    /// TCP congestion control algorithms to test
    #[arg(short = 'a', long, num_args = 1.., default_values = DEFAULT_ALGORITHMS)]
    algorithms: Vec<String>,
    /// Backbone one-way propagation delays to test (in ms)
    #[arg(short = 'd', long, num_args = 1.., default_values_t = DEFAULT_DELAYS.to_vec())]
    delays: Vec<u32>,
    /// Runtime of the iperf clients (in seconds)
    #[arg(short = 'i', long = "iperf-runtime", default_value_t = DEFAULT_RUNTIME)]
    runtime: u32,
    /// Delay before the second iperf client is started (in seconds)
    #[arg(short = 'j', long = "iperf-delayed-start", default_value_t = DEFAULT_STAGGER_DELAY)]
    stagger_delay: u32,
    /// Verbosity, using the names of the Mininet log levels
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    log_level: LogLevel,
    /// Only build the dumbbell and test connectivity and bandwidth
    #[arg(short = 't', long)]
    run_test: bool,
    /// Directory in which all telemetry files and plots are written
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,
    /// Do not prefix privileged commands with sudo
    #[arg(long)]
    no_sudo: bool,
    /// Store the summary of all runs in a json file
    #[arg(long = "json-summary")]
    json_summary: Option<String>,
    /// Export the parsed series as CSV next to the plots
    #[arg(long)]
    export_csv: bool,
    /// The iperf (version 2) binary
    #[arg(long, default_value = "iperf")]
    iperf: String,
    /// Python interpreter with Mininet installed
    #[arg(long, default_value = "python3")]
    python: String,
    /// The mnexec utility of Mininet
    #[arg(long, default_value = "mnexec")]
    mnexec: String,
}

impl CommandLineArguments {
    fn sweep(&self) -> Sweep {
        Sweep {
            algorithms: self.algorithms.clone(),
            delays: self.delays.clone(),
            runtime: self.runtime,
            stagger_delay: self.stagger_delay,
        }
    }

    fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            output_dir: self.output_dir.clone(),
            sudo: !self.no_sudo && !is_root(),
            python: self.python.clone(),
            mnexec: self.mnexec.clone(),
            iperf: self.iperf.clone(),
            log_level: self.log_level.mininet_name().to_string(),
            export_csv: self.export_csv,
            ..Default::default()
        }
    }
}

/// Log levels of Mininet
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
    Output,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Name of the level in Mininet
    fn mininet_name(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Output => "output",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Filter for the logger. `output` lies between `info` and `warning` in Mininet, and still
    /// shows the progress of the experiments.
    fn filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info | LogLevel::Output => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        CommandLineArguments::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = CommandLineArguments::try_parse_from(vec!["ccbench"]).unwrap();
        assert_eq!(args.sweep(), Sweep::default());
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(!args.run_test);
        assert_eq!(args.json_summary, None);
        assert_eq!(args.runtime_config().output_dir, PathBuf::from("."));
    }

    #[test]
    fn arguments() {
        let args = CommandLineArguments::try_parse_from(vec![
            "ccbench", "-a", "bbr", "vegas", "-d", "10", "-i", "60", "-j", "20", "-l", "debug",
            "--no-sudo", "-o", "/tmp/results",
        ])
        .unwrap();
        let sweep = args.sweep();
        assert_eq!(sweep.algorithms, vec!["bbr", "vegas"]);
        assert_eq!(sweep.delays, vec![10]);
        assert_eq!(sweep.runtime, 60);
        assert_eq!(sweep.stagger_delay, 20);

        let cfg = args.runtime_config();
        assert!(!cfg.sudo);
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/results"));
    }

    #[test]
    fn log_levels() {
        let args = CommandLineArguments::try_parse_from(vec!["ccbench", "-l", "output"]).unwrap();
        assert_eq!(args.log_level.filter(), "info");
        assert_eq!(args.log_level.mininet_name(), "output");
        assert!(CommandLineArguments::try_parse_from(vec!["ccbench", "-l", "verbose"]).is_err());
        assert!(CommandLineArguments::try_parse_from(vec!["ccbench", "-i", "-5"]).is_err());
    }
}
