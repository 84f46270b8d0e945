use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};

use tokio::{io::AsyncWriteExt, process::Command};

use super::Remuxer;
use crate::{
    error::{KirinukiError, KirinukiResult},
    segment::AssembledStream,
};

/// Exit code ffmpeg reports when it is interrupted by a signal.
const INTERRUPTED_EXIT_CODE: i32 = 255;

/// Runs an external program that reads a transport stream from stdin and
/// writes a container to the path given as its last argument.
#[derive(Debug, Clone)]
pub struct CommandRemuxer {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandRemuxer {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Uses the `ffmpeg` found in `PATH`.
    pub fn ffmpeg() -> KirinukiResult<Self> {
        let ffmpeg = which::which("ffmpeg")?;
        Ok(Self::ffmpeg_at(ffmpeg))
    }

    /// Copies the mpegts streams into mp4 without re-encoding.
    pub fn ffmpeg_at<P>(ffmpeg: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self::new(
            ffmpeg,
            [
                "-hide_banner",
                "-f",
                "mpegts",
                "-i",
                "pipe:",
                "-c",
                "copy",
                "-f",
                "mp4",
                "-y",
            ],
        )
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Remuxer for CommandRemuxer {
    async fn remux(&self, stream: AssembledStream, output: &Path) -> KirinukiResult<()> {
        tracing::debug!(
            "Remuxing {} bytes with {}",
            stream.len(),
            self.program.display()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // The child may block writing its output until it has drained stdin,
        // so feeding it must not hold up waiting for it.
        let stdin = child.stdin.take();
        let writer = tokio::spawn(async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            let data = stream.into_bytes();
            stdin.write_all(&data).await?;
            stdin.flush().await
        });

        let result = child.wait_with_output().await?;
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!("Remux input closed early: {e}"),
            Err(e) => tracing::warn!("Remux writer task failed: {e}"),
        }

        let diagnostic = String::from_utf8_lossy(&result.stderr).into_owned();
        check_exit(result.status, diagnostic)
    }
}

fn check_exit(status: ExitStatus, diagnostic: String) -> KirinukiResult<()> {
    if status.success() {
        return Ok(());
    }

    if is_benign_exit(status.code()) {
        tracing::warn!("Remux terminated with {status}, treated as finished.");
        return Ok(());
    }

    Err(KirinukiError::CollaboratorFailure(diagnostic))
}

/// Terminations by signal and ffmpeg's interrupted exit code show up when the
/// input side is closed before the tool finished draining it.
fn is_benign_exit(code: Option<i32>) -> bool {
    match code {
        None => true,
        Some(code) => code == INTERRUPTED_EXIT_CODE,
    }
}
