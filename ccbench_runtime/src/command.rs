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

//! # External Commands
//!
//! Every external program is described by a [`CommandSpec`]: the program, its arguments, and
//! optionally the network namespace of a host in which it runs, whether it needs `sudo`, and the
//! file to which its standard output is written. No shell is involved.
//!
//! Long-running programs are spawned as a [`ManagedProcess`]. When it is dropped while still
//! running, it is terminated with SIGTERM, and only killed if it does not exit within its grace
//! period. `sudo` relays SIGTERM to the command it runs, but SIGKILL only kills `sudo` itself.

use crate::config::DEFAULT_TERMINATE_GRACE;
use crate::error::ProcessError;

use log::*;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Description of an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    namespace: Vec<String>,
    sudo: bool,
    stdout: Option<PathBuf>,
    grace: Duration,
}

impl CommandSpec {
    /// New command, executing `program` without arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            namespace: Vec::new(),
            sudo: false,
            stdout: None,
            grace: DEFAULT_TERMINATE_GRACE,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.args.extend(args.into_iter().map(|a| a.to_string()));
        self
    }

    /// Execute the command with `sudo`
    pub fn sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    /// Execute the command inside a network namespace. `prefix` is the command that enters the
    /// namespace, e.g. `mnexec -a <pid>`.
    pub fn in_namespace(mut self, prefix: Vec<String>) -> Self {
        self.namespace = prefix;
        self
    }

    /// Redirect the standard output to a file, which is truncated.
    pub fn stdout_to(mut self, path: impl AsRef<Path>) -> Self {
        self.stdout = Some(path.as_ref().to_path_buf());
        self
    }

    /// Time the spawned process gets to exit after SIGTERM when it is dropped
    pub fn terminate_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// The complete argument vector, including `sudo` and the namespace prefix
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + self.namespace.len() + 2);
        if self.sudo {
            argv.push(String::from("sudo"));
        }
        argv.extend(self.namespace.iter().cloned());
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Start the command, without waiting for it. Standard error is inherited.
    pub fn spawn(&self) -> Result<ManagedProcess, ProcessError> {
        let mut command = self.command();
        match self.stdout.as_ref() {
            Some(path) => {
                let file = File::create(path).map_err(|source| ProcessError::OutputFile {
                    command: self.to_string(),
                    path: path.clone(),
                    source,
                })?;
                command.stdout(file);
            }
            None => {
                command.stdout(Stdio::null());
            }
        }
        command.stdin(Stdio::null()).stderr(Stdio::inherit());

        debug!("spawning: {}", self);
        let child = command.spawn().map_err(|source| self.launch_failed(source))?;
        Ok(ManagedProcess {
            name: self.to_string(),
            child,
            status: None,
            sudo: self.sudo,
            grace: self.grace,
        })
    }

    /// Run the command to completion, and capture its output. A non-zero exit status is not an
    /// error, it is part of the output.
    pub fn output(&self) -> Result<CommandOutput, ProcessError> {
        debug!("running: {}", self);
        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|source| self.launch_failed(source))?;
        Ok(CommandOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn command(&self) -> Command {
        let argv = self.argv();
        let mut command = Command::new(&argv[0]);
        command.args(&argv[1..]);
        command
    }

    fn launch_failed(&self, source: io::Error) -> ProcessError {
        ProcessError::LaunchFailed { command: self.to_string(), source }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))?;
        if let Some(path) = self.stdout.as_ref() {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}

/// Output of a command that was run to completion
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status
    pub status: ExitStatus,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Standard output followed by standard error, trimmed
    pub fn text(&self) -> String {
        format!("{}{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// A running external process.
#[derive(Debug)]
pub struct ManagedProcess {
    name: String,
    child: Child,
    status: Option<ExitStatus>,
    sudo: bool,
    grace: Duration,
}

impl ManagedProcess {
    /// PID of the process
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Command line of the process
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until the process exits, without any timeout.
    pub fn wait(&mut self) -> Result<ExitStatus, ProcessError> {
        if let Some(status) = self.status {
            return Ok(status);
        }
        let status = self.child.wait().map_err(|source| self.wait_failed(source))?;
        self.status = Some(status);
        Ok(status)
    }

    /// Block until the process exits, and require it to exit successfully.
    pub fn wait_success(&mut self) -> Result<(), ProcessError> {
        let status = self.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::ExitedNonZero { command: self.name.clone(), status })
        }
    }

    /// Send SIGTERM to the process. If the process has already exited, nothing happens.
    pub fn terminate(&mut self) -> Result<(), ProcessError> {
        if self.poll()?.is_some() {
            return Ok(());
        }
        self.signal(libc::SIGTERM)
    }

    /// Wait for the process to exit after it was asked to terminate. If it is still running after
    /// `grace`, it is killed, and given another `grace` to exit.
    pub fn wait_terminated(&mut self, grace: Duration) -> Result<ExitStatus, ProcessError> {
        if let Some(status) = self.wait_for(grace)? {
            return Ok(status);
        }
        if self.sudo {
            warn!(
                "{} did not exit after SIGTERM, killing sudo. The command it runs may survive!",
                self.name
            );
        } else {
            warn!("{} did not exit after SIGTERM, killing it", self.name);
        }
        self.signal(libc::SIGKILL)?;
        match self.wait_for(grace)? {
            Some(status) => Ok(status),
            None => Err(ProcessError::StillRunning { command: self.name.clone(), pid: self.pid() }),
        }
    }

    /// Terminate the process and wait for it. See [`ManagedProcess::wait_terminated`].
    pub fn terminate_and_wait(&mut self, grace: Duration) -> Result<ExitStatus, ProcessError> {
        self.terminate()?;
        let status = self.wait_terminated(grace)?;
        debug!("{} exited with {}", self.name, status);
        Ok(status)
    }

    fn poll(&mut self) -> Result<Option<ExitStatus>, ProcessError> {
        if self.status.is_none() {
            self.status = self.child.try_wait().map_err(|source| self.wait_failed(source))?;
        }
        Ok(self.status)
    }

    fn wait_for(&mut self, timeout: Duration) -> Result<Option<ExitStatus>, ProcessError> {
        let start = Instant::now();
        loop {
            if let Some(status) = self.poll()? {
                return Ok(Some(status));
            }
            if start.elapsed() >= timeout {
                return Ok(None);
            }
            sleep(POLL_INTERVAL);
        }
    }

    fn signal(&mut self, signal: i32) -> Result<(), ProcessError> {
        debug!("sending signal {} to {} (pid {})", signal, self.name, self.pid());
        let ret = unsafe { libc::kill(self.pid() as libc::pid_t, signal) };
        if ret == 0 {
            return Ok(());
        }
        let source = io::Error::last_os_error();
        // the process exited in the meantime
        if source.raw_os_error() == Some(libc::ESRCH) {
            return Ok(());
        }
        Err(ProcessError::Signal { command: self.name.clone(), signal, source })
    }

    fn wait_failed(&self, source: io::Error) -> ProcessError {
        ProcessError::Wait { command: self.name.clone(), source }
    }
}

impl Drop for ManagedProcess {
    fn drop(&mut self) {
        if let Ok(Some(_)) = self.poll() {
            return;
        }
        warn!("Stopping {}, which is still running", self.name);
        if let Err(e) = self.terminate_and_wait(self.grace) {
            error!("{}", e);
            if let Err(e) = self.child.kill() {
                error!("Cannot kill {}: {}", self.name, e);
            }
            let _ = self.child.try_wait();
        }
    }
}
