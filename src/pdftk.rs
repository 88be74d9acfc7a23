//! pdftk subprocess bridge.
//!
//! Metadata is read with `pdftk <in> dump_data_utf8` and written with
//! `pdftk <in> update_info_utf8 - output <out>`, feeding the revised dump on
//! stdin. Both calls block until pdftk exits; a failed run is always an
//! error, never a silently ignored status.

use std::ffi::OsStr;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::{Error, PdftkError, Result};
use crate::util::{decode_lossy, decode_utf8};

/// Default executable name, looked up on `PATH`.
pub const DEFAULT_PROGRAM: &str = "pdftk";

/// Handle to a pdftk executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdftk {
    program: PathBuf,
}

impl Default for Pdftk {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Pdftk {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Dump the metadata of `input` as text.
    pub fn dump(&self, input: &Path) -> Result<String> {
        let mut command = self.command([input.as_os_str(), OsStr::new("dump_data_utf8")]);
        debug!(?command, "dumping metadata");

        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(|source| self.spawn_error(source))?;
        check_status(&output)?;

        Ok(decode_utf8(&output.stdout)?.into_owned())
    }

    /// Write `input` to `output` with its metadata replaced by `metadata`.
    pub fn update(&self, input: &Path, metadata: &str, output: &Path) -> Result<()> {
        let mut command = self.command([
            input.as_os_str(),
            OsStr::new("update_info_utf8"),
            OsStr::new("-"),
            OsStr::new("output"),
            output.as_os_str(),
        ]);
        debug!(?command, bytes = metadata.len(), "updating metadata");

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        // Feed stdin from its own thread while this one drains stdout and
        // stderr, so a chatty pdftk cannot stall on a full pipe.
        let stdin = child.stdin.take();
        let (write_result, result) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                // Dropping stdin at the end of the write closes it for pdftk.
                Some(mut stdin) => stdin.write_all(metadata.as_bytes()),
                None => Err(ErrorKind::BrokenPipe.into()),
            });
            let result = child.wait_with_output();
            let write_result = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (write_result, result)
        });
        let result = result?;

        match write_result {
            Ok(()) => check_status(&result),
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                // A process that died early explains the pipe; report its status.
                check_status(&result)?;
                warn!("pdftk exited successfully without reading all metadata");
                Err(PdftkError::BrokenPipe.into())
            }
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(args);
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        warn!(program = %self.program.display(), %source, "failed to start pdftk");
        PdftkError::Spawn {
            program: self.program.clone(),
            source,
        }
        .into()
    }
}

fn check_status(output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = decode_lossy(&output.stderr);
    warn!(status = %output.status, %stderr, "pdftk failed");
    Err(PdftkError::Failed {
        status: output.status,
        stderr,
    }
    .into())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-pdftk");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_dump_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let pdftk = Pdftk::new(script(&dir, r#"printf 'NumberOfPages: 2\n'"#));
        let text = pdftk.dump(Path::new("in.pdf")).unwrap();
        assert_eq!(text, "NumberOfPages: 2\n");
    }

    #[test]
    fn test_dump_passes_arguments() {
        let dir = TempDir::new().unwrap();
        let pdftk = Pdftk::new(script(&dir, r#"echo "$1|$2""#));
        let text = pdftk.dump(Path::new("my file.pdf")).unwrap();
        assert_eq!(text, "my file.pdf|dump_data_utf8\n");
    }

    #[test]
    fn test_non_zero_exit_is_failure() {
        let dir = TempDir::new().unwrap();
        let pdftk = Pdftk::new(script(&dir, "echo 'Error: no such file' >&2\nexit 3"));
        let err = pdftk.dump(Path::new("missing.pdf")).unwrap_err();
        match err {
            Error::Pdftk(PdftkError::Failed { status, stderr }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "Error: no such file");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let pdftk = Pdftk::new(dir.path().join("does-not-exist"));
        let err = pdftk.dump(Path::new("in.pdf")).unwrap_err();
        assert!(matches!(err, Error::Pdftk(PdftkError::Spawn { .. })));
    }

    #[test]
    fn test_update_feeds_stdin() {
        let dir = TempDir::new().unwrap();
        // $5 is the output path: <in> update_info_utf8 - output <out>
        let pdftk = Pdftk::new(script(&dir, r#"[ "$2" = update_info_utf8 ] && cat > "$5""#));
        let out = dir.path().join("out.pdf");
        pdftk
            .update(Path::new("in.pdf"), "NumberOfPages: 1\n", &out)
            .unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), "NumberOfPages: 1\n");
    }

    #[test]
    fn test_update_survives_output_larger_than_pipe_buffers() {
        let dir = TempDir::new().unwrap();
        // Fill both output pipes before reading any input.
        let pdftk = Pdftk::new(script(
            &dir,
            "yes progress | head -c 300000\nyes warning | head -c 300000 >&2\ncat > \"$5\"",
        ));
        let metadata = "InfoKey: Padding\n".repeat(20_000);
        let out = dir.path().join("out.pdf");
        pdftk.update(Path::new("in.pdf"), &metadata, &out).unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), metadata);
    }

    #[test]
    fn test_update_reports_failed_exit() {
        let dir = TempDir::new().unwrap();
        let pdftk = Pdftk::new(script(&dir, "cat > /dev/null\nexit 1"));
        let err = pdftk
            .update(Path::new("in.pdf"), "x\n", &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::Pdftk(PdftkError::Failed { .. })));
    }

    #[test]
    fn test_update_without_reading_input_fails() {
        let dir = TempDir::new().unwrap();
        let pdftk = Pdftk::new(script(&dir, "exit 2"));
        let big = "BookmarkTitle: x\n".repeat(100_000);
        let err = pdftk
            .update(Path::new("in.pdf"), &big, &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::Pdftk(PdftkError::Failed { .. })));
    }
}
