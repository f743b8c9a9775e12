//! Semantic oracle backed by an external command.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use anyhow::{Result, bail};
use tracing::debug;

use fieldmap_core::{CompletionOracle, OracleError};

/// Build a [`CompletionOracle`] that pipes each prompt through `command_line`.
///
/// The command line is split on whitespace; no shell is involved. A command
/// that cannot be started, exits unsuccessfully, or prints non-UTF-8 output
/// is reported as an [`OracleError`], which the matcher treats as "no
/// semantic matches".
pub fn command_oracle(
    command_line: &str,
) -> Result<CompletionOracle<impl Fn(&str) -> Result<String, OracleError> + Send + Sync + 'static>>
{
    let mut words = command_line.split_whitespace().map(str::to_string);
    let Some(program) = words.next() else {
        bail!("oracle command is empty");
    };
    let args: Vec<String> = words.collect();
    let label = format!("command:{program}");
    Ok(CompletionOracle::new(label, move |prompt: &str| {
        run_completion(&program, &args, prompt)
    }))
}

fn run_completion(program: &str, args: &[String], prompt: &str) -> Result<String, OracleError> {
    debug!(program, "running oracle command");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|error| OracleError::Unavailable(format!("failed to start {program}: {error}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        // A command may answer without reading its input.
        match stdin.write_all(prompt.as_bytes()) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::BrokenPipe => {}
            Err(error) => {
                return Err(OracleError::Unavailable(format!(
                    "failed to write prompt to {program}: {error}"
                )));
            }
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|error| OracleError::Unavailable(format!("{program} did not finish: {error}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OracleError::Unavailable(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    String::from_utf8(output.stdout)
        .map_err(|error| OracleError::MalformedResponse(format!("{program} printed non-UTF-8 output: {error}")))
}
