//! Running the transcoder.
//!
//! The process is spawned with stderr piped; each line it writes
//! (progress updates are `\r`-terminated) is handed to the run logger
//! as it arrives.

use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::logging::RunLogger;

/// How the transcoder process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRun {
    /// Exit code, `-1` if the process was killed by a signal.
    pub exit_code: i32,
    /// Number of stderr lines forwarded to the logger.
    pub lines: usize,
}

impl TranscodeRun {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawn `program` with `tokens` and stream its stderr to `logger`.
///
/// Only spawn and pipe errors are returned as `Err`; a non-zero exit is
/// reported through [`TranscodeRun::exit_code`].
pub fn run_transcoder(program: &Path, tokens: &[String], logger: &RunLogger) -> io::Result<TranscodeRun> {
    let mut child = Command::new(program)
        .args(tokens)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let forwarded = match child.stderr.take() {
        Some(stderr) => forward_lines(stderr, logger),
        None => Ok(0),
    };
    let lines = match forwarded {
        Ok(lines) => lines,
        Err(e) => {
            // Don't leave the transcoder running unreaped.
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    let status = child.wait()?;
    Ok(TranscodeRun {
        exit_code: status.code().unwrap_or(-1),
        lines,
    })
}

/// Send every `\n`- or `\r`-terminated line of `source` to the logger.
fn forward_lines<R: Read>(source: R, logger: &RunLogger) -> io::Result<usize> {
    let mut lines = 0;
    for chunk in BufReader::new(source).split(b'\n') {
        let chunk = chunk?;
        for part in chunk.split(|b| *b == b'\r') {
            let line = String::from_utf8_lossy(part);
            let line = line.trim_end();
            if !line.is_empty() {
                logger.tool_line(line);
                lines += 1;
            }
        }
    }
    Ok(lines)
}
