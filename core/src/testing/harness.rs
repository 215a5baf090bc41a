use std::{
    io,
    path::PathBuf,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    process::{Child, Command},
    time::Instant,
};

/// Why a single execution did not finish normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Timeout,
    /// `code` is `None` when the process was killed by a signal.
    NonZeroExit { code: Option<i32> },
    SpawnError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub elapsed: Duration,
    pub stdout: String,
    pub failure: Option<Failure>,
}

/// Runs one command line against one input under a wall-clock deadline.
///
/// Without a shell the command line is split on whitespace and the first word
/// is executed directly, so a missing program is reported as
/// [`Failure::SpawnError`]. With a shell the line is passed to `<shell> -c`.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    shell: Option<PathBuf>,
    working_dir: Option<PathBuf>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shell(mut self, shell: Option<impl Into<PathBuf>>) -> Self {
        self.shell = shell.map(Into::into);
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self, cmdline: &str) -> Result<Command, String> {
        let mut cmd = match &self.shell {
            Some(shell) => {
                let mut cmd = Command::new(shell);
                cmd.args(["-c", cmdline]);
                cmd
            }
            None => {
                let mut words = cmdline.split_whitespace();
                let Some(program) = words.next() else {
                    return Err("empty command".to_owned());
                };
                let mut cmd = Command::new(program);
                cmd.args(words);
                cmd
            }
        };
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }

    /// Feeds `input` to the command, captures its stdout and kills it once
    /// `time_limit` has passed. stderr is passed through to ours.
    pub async fn execute(
        &self,
        cmdline: &str,
        input: &str,
        time_limit: Duration,
    ) -> ExecutionOutcome {
        let start_at = Instant::now();
        let elapsed = || truncate_to_millis(start_at.elapsed());

        let spawned = self.command(cmdline).and_then(|mut cmd| {
            // Own process group, so that a timeout takes down everything it started.
            #[cfg(unix)]
            cmd.process_group(0);
            cmd.stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| format!("Failed to spawn '{}': {}", cmdline, e))
        });
        let mut child = match spawned {
            Ok(child) => child,
            Err(msg) => {
                return ExecutionOutcome {
                    elapsed: elapsed(),
                    stdout: String::new(),
                    failure: Some(Failure::SpawnError(msg)),
                }
            }
        };

        let pid = child.id();
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();

        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(input.as_bytes()).await {
                // The program may exit without reading its input.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                res => res,
            }
            // stdin is dropped here so that the child sees EOF
        };
        let mut stdout_buf = Vec::new();
        let collect = async {
            match stdout {
                Some(mut stdout) => stdout.read_to_end(&mut stdout_buf).await.map(|_| ()),
                None => Ok(()),
            }
        };

        let res = tokio::time::timeout(time_limit, async {
            tokio::try_join!(feed, collect, child.wait())
        })
        .await;
        let elapsed = elapsed();

        let failure = match res {
            Err(_) => {
                kill_tree(&mut child, pid, cmdline).await;
                Some(Failure::Timeout)
            }
            Ok(Err(e)) => {
                log::warn!("Failed to communicate with '{}': {}", cmdline, e);
                kill_tree(&mut child, pid, cmdline).await;
                Some(Failure::NonZeroExit { code: None })
            }
            Ok(Ok((_, _, status))) => {
                // background jobs left behind by the command
                kill_process_group(pid);
                classify_exit_status(status)
            }
        };

        ExecutionOutcome {
            elapsed,
            stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
            failure,
        }
    }

    /// Runs the command attached to our own stdin/stdout/stderr until it exits.
    pub async fn execute_attached(&self, cmdline: &str) -> anyhow::Result<ExitStatus> {
        use anyhow::{anyhow, Context as _};

        let mut cmd = self.command(cmdline).map_err(|e| anyhow!(e))?;
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn '{}'", cmdline))?;
        child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for '{}'", cmdline))
    }
}

async fn kill_tree(child: &mut Child, pid: Option<u32>, cmdline: &str) {
    kill_process_group(pid);
    child
        .kill()
        .await
        .unwrap_or_else(|e| log::warn!("Failed to kill '{}': {}", cmdline, e));
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::{
        errno::Errno,
        sys::signal::{killpg, Signal},
        unistd::Pid,
    };

    let Some(pid) = pid else {
        return;
    };
    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => log::warn!("Failed to kill process group {}: {}", pid, e),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

fn classify_exit_status(status: ExitStatus) -> Option<Failure> {
    if status.success() {
        None
    } else {
        Some(Failure::NonZeroExit {
            code: status.code(),
        })
    }
}

fn truncate_to_millis(d: Duration) -> Duration {
    Duration::from_millis(d.as_millis() as u64)
}

#[cfg(test)]
mod test {
    use super::*;

    fn sh() -> Harness {
        Harness::new().shell(Some("/bin/sh"))
    }

    #[tokio::test]
    async fn captures_stdout_from_stdin() {
        let out = sh()
            .execute("read x; echo $((x * x))", "3\n", Duration::from_secs(2))
            .await;
        assert_eq!(out.failure, None);
        assert_eq!(out.stdout, "9\n");
        assert!(out.elapsed < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn ok_even_if_stdin_is_not_read() {
        let input = "x".repeat(1 << 20);
        let out = sh()
            .execute("echo hello", &input, Duration::from_secs(2))
            .await;
        assert_eq!(out.failure, None);
        assert_eq!(out.stdout, "hello\n");
    }

    #[tokio::test]
    async fn large_output_does_not_deadlock() {
        let input = "y\n".repeat(200_000);
        let out = sh().execute("cat", &input, Duration::from_secs(5)).await;
        assert_eq!(out.failure, None);
        assert_eq!(out.stdout.len(), input.len());
    }

    #[tokio::test]
    async fn non_zero_exit_keeps_stdout() {
        let out = sh()
            .execute("echo 9; exit 42", "", Duration::from_secs(2))
            .await;
        assert_eq!(out.failure, Some(Failure::NonZeroExit { code: Some(42) }));
        assert_eq!(out.stdout, "9\n");
    }

    #[tokio::test]
    async fn killed_by_signal_is_non_zero_exit() {
        let out = sh()
            .execute("kill -9 $$", "", Duration::from_secs(2))
            .await;
        assert_eq!(out.failure, Some(Failure::NonZeroExit { code: None }));
    }

    #[tokio::test]
    async fn timeout_kills_the_process() {
        let limit = Duration::from_millis(300);
        let out = Harness::new().execute("sleep 5", "", limit).await;
        assert_eq!(out.failure, Some(Failure::Timeout));
        assert!(out.elapsed >= limit);
        assert!(out.elapsed < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_processes_started_by_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("alive");
        let cmdline = format!("(sleep 1; touch '{}'); true", marker.display());

        let out = sh()
            .execute(&cmdline, "", Duration::from_millis(300))
            .await;
        assert_eq!(out.failure, Some(Failure::Timeout));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!marker.exists(), "subshell survived the timeout");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn background_jobs_do_not_outlive_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("alive");
        let cmdline = format!("(sleep 1; touch '{}') >/dev/null 2>&1 &", marker.display());

        let out = sh().execute(&cmdline, "", Duration::from_secs(2)).await;
        assert_eq!(out.failure, None);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!marker.exists(), "background job survived the command");
    }

    #[tokio::test]
    async fn direct_mode_splits_arguments() {
        let out = Harness::new()
            .execute("echo  a   b", "", Duration::from_secs(2))
            .await;
        assert_eq!(out.failure, None);
        assert_eq!(out.stdout, "a b\n");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let out = Harness::new()
            .execute("./definitely-not-a-program-4242", "", Duration::from_secs(2))
            .await;
        assert!(matches!(out.failure, Some(Failure::SpawnError(_))), "{:?}", out);

        let out = Harness::new().execute("   ", "", Duration::from_secs(2)).await;
        assert!(matches!(out.failure, Some(Failure::SpawnError(_))));
    }

    #[tokio::test]
    async fn runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.txt"), "from file\n").unwrap();
        let out = Harness::new()
            .working_dir(dir.path())
            .execute("cat data.txt", "", Duration::from_secs(2))
            .await;
        assert_eq!(out.stdout, "from file\n");
    }

    #[test]
    fn elapsed_is_truncated_to_millis() {
        assert_eq!(
            truncate_to_millis(Duration::from_micros(1_999_999)),
            Duration::from_millis(1999)
        );
    }
}
