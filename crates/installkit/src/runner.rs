//! Command execution.
//!
//! [`CommandRunner`] runs one shell command line and hands back its exit
//! code and captured output. Installers never spawn processes themselves;
//! they go through a runner so tests can substitute [`crate::MockSystem`].

use crate::error::{Error, Result};
use crate::types::{CommandOutput, ExecOptions};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Polling interval while waiting on a command with a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Executes shell command lines.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion (or until the timeout elapses).
    ///
    /// A non-zero exit is not an error here; it is reported through
    /// [`CommandOutput::code`]. Errors are reserved for failing to spawn
    /// the shell and for timeouts.
    fn exec(&self, command: &str, options: &ExecOptions) -> Result<CommandOutput>;
}

/// [`CommandRunner`] that spawns real processes.
///
/// Commands run through `sh -c` on Unix and `cmd /C` on Windows, with
/// stdin closed so package managers cannot block on a prompt.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn shell(command: &str) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        }
        #[cfg(not(windows))]
        {
            use std::os::unix::process::CommandExt;
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            // Own process group, so a timeout can kill the whole pipeline
            cmd.process_group(0);
            cmd
        }
    }
}

impl CommandRunner for SystemRunner {
    fn exec(&self, command: &str, options: &ExecOptions) -> Result<CommandOutput> {
        log::debug!("exec: {}", command);

        let mut child = Self::shell(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::io(SHELL, e))?;

        #[cfg(unix)]
        let foreground = terminal::Foreground::hand_to(child.id());

        // Drain pipes on their own threads so a chatty command cannot
        // fill a pipe buffer and stall before the deadline.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let waited = match options.timeout {
            Some(timeout) => wait_with_deadline(&mut child, command, timeout),
            None => child.wait().map_err(|e| Error::io(SHELL, e)),
        };

        #[cfg(unix)]
        drop(foreground);

        // Every writer is gone once the group is dead, so these return
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        let output = CommandOutput {
            code: waited?.code().unwrap_or(-1),
            stdout,
            stderr,
        };

        log::trace!("exit {}: {}", output.code, command);
        Ok(output)
    }
}

#[cfg(windows)]
const SHELL: &str = "cmd";
#[cfg(not(windows))]
const SHELL: &str = "sh";

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_deadline(
    child: &mut Child,
    command: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                log::warn!("Killing `{}` after {:?}", command, timeout);
                kill_tree(child);
                let _ = child.wait();
                return Err(Error::Timeout {
                    command: command.to_string(),
                    timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(Error::io(SHELL, e)),
        }
    }
}

/// Kill the shell and everything it started.
#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        let _ = child.kill();
        return;
    };
    // SAFETY: killpg only sends a signal; pgid is the group created at spawn
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}

#[cfg(unix)]
mod terminal {
    //! Terminal ownership for commands running in their own process group.
    //!
    //! A background process group that reads the terminal is stopped, and
    //! `sudo` reads its password from `/dev/tty`. While a command runs, its
    //! group is made the terminal's foreground group.

    use libc::{STDIN_FILENO, c_int, pid_t};

    pub(super) struct Foreground {
        previous: Option<pid_t>,
    }

    impl Foreground {
        /// Give the terminal to `pid`'s group, if this process owns it.
        pub(super) fn hand_to(pid: u32) -> Self {
            let Ok(pgid) = pid_t::try_from(pid) else {
                return Self { previous: None };
            };
            // SAFETY: terminal queries and tcsetpgrp on stdin; no memory is shared
            let previous = unsafe {
                if libc::isatty(STDIN_FILENO) == 0 {
                    return Self { previous: None };
                }
                let current = libc::tcgetpgrp(STDIN_FILENO);
                if current != libc::getpgrp() {
                    return Self { previous: None };
                }
                if set_foreground(pgid) != 0 {
                    return Self { previous: None };
                }
                // a read before the handover stopped the group
                libc::killpg(pgid, libc::SIGCONT);
                current
            };
            Self {
                previous: Some(previous),
            }
        }
    }

    impl Drop for Foreground {
        fn drop(&mut self) {
            if let Some(pgid) = self.previous {
                // SAFETY: restores the group saved in hand_to
                unsafe {
                    set_foreground(pgid);
                }
            }
        }
    }

    /// tcsetpgrp from a background group raises SIGTTOU unless ignored.
    unsafe fn set_foreground(pgid: pid_t) -> c_int {
        // SAFETY: the previous handler is restored before returning
        unsafe {
            let old = libc::signal(libc::SIGTTOU, libc::SIG_IGN);
            let rc = libc::tcsetpgrp(STDIN_FILENO, pgid);
            libc::signal(libc::SIGTTOU, old);
            rc
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_exec_captures_stdout() {
        let output = SystemRunner::new()
            .exec("echo hello", &ExecOptions::new())
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_exec_reports_exit_code_and_stderr() {
        let output = SystemRunner::new()
            .exec("echo oops >&2; exit 3", &ExecOptions::new())
            .unwrap();
        assert_eq!(output.code, 3);
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    fn test_exec_timeout() {
        let options = ExecOptions::new().timeout(Duration::from_millis(200));
        let err = SystemRunner::new().exec("sleep 5", &options).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[test]
    fn test_timeout_kills_the_whole_pipeline() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("late");
        let command = format!("sh -c 'sleep 1; touch \"{}\"' | cat", marker.display());
        let options = ExecOptions::new().timeout(Duration::from_millis(200));

        let started = Instant::now();
        let err = SystemRunner::new().exec(&command, &options).unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(err.to_string().contains("200ms"), "{err}");

        thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists(), "pipeline outlived the timeout");
    }

    #[test]
    fn test_exec_within_timeout() {
        let options = ExecOptions::new().timeout(Duration::from_secs(5));
        let output = SystemRunner::new().exec("true", &options).unwrap();
        assert!(output.success());
    }
}
