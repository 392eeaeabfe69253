//! Subprocess execution with a wall-clock limit

use std::io::{self, Read};
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run `cmd` to completion, killing it once `timeout` has elapsed.
///
/// Returns `Ok(None)` when the process was killed. Standard input is
/// closed so the child can never wait on a prompt.
///
/// On Unix the child leads its own process group, and a timeout kills the
/// whole group so helpers it spawned (`git-remote-https`, `index-pack`)
/// stop writing as well.
pub fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> io::Result<Option<Output>> {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drained on threads so a chatty child cannot fill a pipe and stall
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            tracing::warn!(pid = child.id(), "Process exceeded {:?}, killing it", timeout);
            kill_tree(&mut child);
            let _ = child.wait();
            // Grandchildren may still hold the pipes; the drain threads are left to finish alone
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Some(Output {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    }))
}

fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: kill(2) takes plain integers; a negative pid targets
            // the group this child leads and touches no memory.
            let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
            if rc != 0 {
                tracing::debug!(
                    pgid,
                    "Could not signal process group: {}",
                    io::Error::last_os_error()
                );
            }
        }
    }
    let _ = child.kill();
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
