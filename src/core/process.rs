//! Subprocess execution with captured output and optional timeouts.
//!
//! All external commands salt runs (which in practice means `git`) go through
//! [`run_command`]. Output is captured on background reader threads so a child
//! that fills its pipe can never deadlock the parent, and a timeout kills the
//! child instead of hanging the whole run.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::error::{Result, SaltError};

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout with trailing whitespace removed, for single-line git queries
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim_end()
    }

    /// stderr trimmed for inclusion in error messages
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Run a command, capture stdout/stderr, and return its exit status.
///
/// `cwd` sets the working directory when given. `timeout` bounds the total
/// runtime; on expiry the child is killed and [`SaltError::Timeout`] is
/// returned. Local git queries pass `None` and block until completion.
pub fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Option<Duration>,
) -> Result<ProcessOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    log::debug!("running: {} {}", program, args.join(" "));

    let mut child = cmd.spawn()?;

    // Drain both pipes off-thread; polling try_wait while the pipes back up
    // would deadlock once the child fills a pipe buffer.
    let stdout_handle = spawn_reader(child.stdout.take());
    let stderr_handle = spawn_reader(child.stderr.take());

    let status = match timeout {
        None => child.wait()?,
        Some(limit) => {
            let deadline = Instant::now() + limit;
            loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if Instant::now() >= deadline {
                    child.kill().ok();
                    child.wait().ok();
                    // Let the readers observe EOF before dropping them.
                    stdout_handle.join().ok();
                    stderr_handle.join().ok();
                    let command = describe(program, args);
                    return Err(SaltError::timeout(command, limit.as_secs()));
                }
                thread::sleep(Duration::from_millis(50));
            }
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    let output = ProcessOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    };

    if !output.success() {
        log::debug!(
            "{} exited {}: {}",
            describe(program, args),
            output.exit_code,
            output.stderr_trimmed()
        );
    }

    Ok(output)
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut reader) = source {
            reader.read_to_end(&mut buf).ok();
        }
        buf
    })
}

fn describe(program: &str, args: &[&str]) -> String {
    match args.first() {
        Some(first) => format!("{program} {first}"),
        None => program.to_string(),
    }
}
