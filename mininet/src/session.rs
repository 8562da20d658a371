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

//! # Mininet Session

use crate::types::*;
use crate::{Error, Result};

use log::*;
use regex::Regex;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Python program which builds the topology, starts the network and waits for the stop command.
/// All messages on stdout are single-line JSON objects. Mininet itself logs on stderr.
const HELPER_PROGRAM: &str = "
import json, sys
out = sys.stdout
sys.stdout = sys.stderr

def reply(msg):
    out.write(json.dumps(msg) + '\\n')
    out.flush()

try:
    from mininet.net import Mininet
    from mininet.topo import Topo
    from mininet.link import TCLink
    from mininet.log import setLogLevel

    class JsonTopo(Topo):
        def build(self, spec=None):
            for name in spec['switches']:
                self.addSwitch(name)
            for name in spec['hosts']:
                self.addHost(name)
            for link in spec['links']:
                self.addLink(link['a'], link['b'], cls=TCLink, **link['params'])

    spec = json.loads(sys.stdin.readline())
    setLogLevel(spec['log_level'])
    net = Mininet(JsonTopo(spec=spec))
    net.start()
except Exception as e:
    reply({'status': 'error', 'message': repr(e)})
    sys.exit(1)

def connections(node):
    result = []
    for intf in node.intfList():
        link = intf.link
        if link:
            peer = link.intf2 if link.intf1 == intf else link.intf1
            result.append({'intf': intf.name, 'peer': peer.name})
    return result

reply({'status': 'ready', 'hosts': [
    {'name': h.name, 'ip': h.IP(), 'pid': h.pid, 'connections': connections(h)}
    for h in net.hosts]})

for line in sys.stdin:
    if line.strip() == 'stop':
        break
net.stop()
reply({'status': 'stopped'})
";

/// Options used to start the helper and to execute commands on the hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Python interpreter which has Mininet installed
    pub python: String,
    /// Path to the `mnexec` utility shipped with Mininet
    pub mnexec: String,
    /// Prefix all commands with `sudo`
    pub sudo: bool,
    /// Log level passed to `mininet.log.setLogLevel`
    pub log_level: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            python: String::from("python3"),
            mnexec: String::from("mnexec"),
            sudo: false,
            log_level: String::from("info"),
        }
    }
}

/// # Mininet Session Handle
///
/// A running emulated network. The network is built and started in [`MininetSession::start`], and
/// stopped either explicitly with [`MininetSession::stop`], or when the session is dropped.
#[derive(Debug)]
pub struct MininetSession {
    helper: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    hosts: Vec<HostInfo>,
    options: SessionOptions,
    running: bool,
}

impl MininetSession {
    /// Build the topology and start the network. This blocks until all hosts are up.
    pub fn start(topo: &Topology, options: &SessionOptions) -> Result<Self> {
        let mut command = if options.sudo {
            let mut c = Command::new("sudo");
            c.arg(&options.python);
            c
        } else {
            Command::new(&options.python)
        };
        command
            .arg("-u")
            .arg("-c")
            .arg(HELPER_PROGRAM)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        debug!("Starting the Mininet helper with {}", options.python);
        let mut helper = command
            .spawn()
            .map_err(|source| Error::LaunchError { program: options.python.clone(), source })?;

        let stdin = helper.stdin.take();
        let stdout = match helper.stdout.take() {
            Some(s) => BufReader::new(s),
            None => return Err(Error::HelperTerminated),
        };

        let mut session = Self {
            helper,
            stdin,
            stdout,
            hosts: Vec::new(),
            options: options.clone(),
            running: false,
        };

        let request =
            serde_json::to_string(&HelperRequest { log_level: &options.log_level, topo })?;
        session.send(&request)?;

        match session.receive()? {
            HelperResponse::Ready { hosts } => {
                session.hosts = hosts;
                session.running = true;
                Ok(session)
            }
            HelperResponse::Error { message } => Err(Error::MininetError(message)),
            HelperResponse::Stopped => Err(Error::HelperTerminated),
        }
    }

    /// Returns all hosts of the running network
    pub fn hosts(&self) -> &[HostInfo] {
        &self.hosts
    }

    /// Get the host information of a host by its name
    pub fn host(&self, name: impl AsRef<str>) -> Result<&HostInfo> {
        let name = name.as_ref();
        self.hosts.iter().find(|h| h.name == name).ok_or_else(|| Error::UnknownHost(name.into()))
    }

    /// Returns the options with which this session was started
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Returns the command prefix to execute a program inside the network namespace of a host,
    /// i.e., `mnexec -a <pid>`. `sudo` is not part of the prefix.
    pub fn exec_prefix(&self, host: impl AsRef<str>) -> Result<Vec<String>> {
        let host = self.host(host)?;
        Ok(vec![self.options.mnexec.clone(), String::from("-a"), host.pid.to_string()])
    }

    /// Send a single ping from `src` to `dst`, and parse the result (like `pingFull` in Mininet).
    pub fn ping_full(&self, src: impl AsRef<str>, dst: impl AsRef<str>) -> Result<PingResult> {
        let dst_ip = self.host(dst)?.ip.clone();
        let mut argv = self.exec_prefix(src)?;
        argv.extend(["ping", "-c", "1", "-W", "1"].iter().map(|s| s.to_string()));
        argv.push(dst_ip);

        let output = self.run(&argv)?;
        parse_ping(&output).ok_or_else(|| Error::UnexpectedOutput {
            command: argv.join(" "),
            output: output.clone(),
        })
    }

    /// Stop the network and wait for the helper to exit.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        info!("Stopping the emulated network...");
        self.send("stop")?;
        let response = self.receive();
        // closing stdin makes the helper exit, even if it did not understand the command.
        self.stdin.take();
        let status = self.helper.wait()?;
        debug!("Mininet helper exited with {}", status);
        match response? {
            HelperResponse::Stopped => Ok(()),
            HelperResponse::Error { message } => Err(Error::MininetError(message)),
            HelperResponse::Ready { .. } => Err(Error::MininetError("unexpected answer".into())),
        }
    }

    fn run(&self, argv: &[String]) -> Result<String> {
        let mut command = if self.options.sudo {
            let mut c = Command::new("sudo");
            c.args(argv);
            c
        } else {
            let mut c = Command::new(&argv[0]);
            c.args(&argv[1..]);
            c
        };
        debug!("running: {}", argv.join(" "));
        let output = command
            .output()
            .map_err(|source| Error::LaunchError { program: argv.join(" "), source })?;
        let mut result = String::from_utf8_lossy(&output.stdout).into_owned();
        result.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(result)
    }

    fn send(&mut self, line: &str) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or(Error::HelperTerminated)?;
        stdin.write_all(line.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        Ok(())
    }

    fn receive(&mut self) -> Result<HelperResponse> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(Error::HelperTerminated);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str(trimmed) {
                Ok(response) => return Ok(response),
                Err(_) => debug!("mininet: {}", trimmed),
            }
        }
    }
}

impl Drop for MininetSession {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!("Cannot stop the emulated network: {}", e);
        }
        if self.stdin.take().is_some() {
            // the network was never started. Let the helper exit on its own.
            let _ = self.helper.wait();
        }
    }
}

/// Parse the output of `ping -c 1`.
fn parse_ping(output: &str) -> Option<PingResult> {
    let sent_re = Regex::new(r"(\d+) packets transmitted, (\d+)( packets)? received").unwrap();
    let rtt_re =
        Regex::new(r"min/avg/max/mdev = ([\d.]+)/([\d.]+)/([\d.]+)/([\d.]+) ms").unwrap();

    let captures = sent_re.captures(output)?;
    let sent = captures.get(1)?.as_str().parse().ok()?;
    let received = captures.get(2)?.as_str().parse().ok()?;

    let rtt_ms = rtt_re.captures(output).and_then(|c| {
        Some((
            c.get(1)?.as_str().parse().ok()?,
            c.get(2)?.as_str().parse().ok()?,
            c.get(3)?.as_str().parse().ok()?,
            c.get(4)?.as_str().parse().ok()?,
        ))
    });

    Some(PingResult { sent, received, rtt_ms })
}
