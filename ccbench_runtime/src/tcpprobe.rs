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

//! # Congestion Window Capture
//!
//! The `tcp_probe` kernel module exposes every TCP segment of the watched port in
//! `/proc/net/tcpprobe`. Reading that file blocks, so the capture is a long-running `cat`, which
//! must be terminated explicitly.

use crate::command::{CommandSpec, ManagedProcess};
use crate::config::RuntimeConfig;
use crate::error::ProcessError;

use log::*;
use std::path::Path;

/// File exposed by the `tcp_probe` module
pub const TCPPROBE_PROC_FILE: &str = "/proc/net/tcpprobe";
/// Name of the kernel module
pub const TCPPROBE_MODULE: &str = "tcp_probe";

/// Kill all processes which still read from [`TCPPROBE_PROC_FILE`], e.g. leftovers of an aborted
/// run. Returns the number of processes that were found. If there are none, nothing happens.
/// Failures are logged and never returned.
pub fn clean_capture_procs(cfg: &RuntimeConfig) -> usize {
    // pgrep must not run with sudo, since sudo itself would match the pattern.
    let output = match CommandSpec::new("pgrep").arg("-f").arg(TCPPROBE_PROC_FILE).output() {
        Ok(output) => output,
        Err(e) => {
            warn!("Cannot search for capture processes: {}", e);
            return 0;
        }
    };

    let pids = parse_pids(&output.stdout);
    for pid in pids.iter() {
        info!("Killing stale capture process {}", pid);
        let cmd = CommandSpec::new("kill").arg("-KILL").arg(pid).sudo(cfg.sudo);
        log_output(&cmd);
    }
    pids.len()
}

/// Reload the `tcp_probe` module with `full=1`, such that every segment is reported, not only
/// those which change the congestion window. Failures are logged and never returned.
pub fn reset_module(cfg: &RuntimeConfig) {
    info!("*** Resetting the {} module...", TCPPROBE_MODULE);
    log_output(&CommandSpec::new("rmmod").arg(TCPPROBE_MODULE).sudo(cfg.sudo));
    log_output(&CommandSpec::new("modprobe").arg(TCPPROBE_MODULE).arg("full=1").sudo(cfg.sudo));
}

/// Start capturing into `path`.
pub fn start_capture(
    cfg: &RuntimeConfig,
    path: impl AsRef<Path>,
) -> Result<ManagedProcess, ProcessError> {
    info!("*** Starting the capture into {}", path.as_ref().display());
    CommandSpec::new("cat")
        .arg(TCPPROBE_PROC_FILE)
        .sudo(cfg.sudo)
        .terminate_grace(cfg.terminate_grace)
        .stdout_to(path)
        .spawn()
}

/// Parse the output of `pgrep`, one PID per line. Everything else is ignored.
pub fn parse_pids(output: &str) -> Vec<u32> {
    output.lines().filter_map(|l| l.trim().parse().ok()).collect()
}

fn log_output(cmd: &CommandSpec) {
    match cmd.output() {
        Ok(output) => {
            let text = output.text();
            if !text.is_empty() {
                warn!("{}: {}", cmd, text);
            }
        }
        Err(e) => warn!("{}", e),
    }
}
