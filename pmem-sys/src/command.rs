// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;
use std::process::Command;

use pmem_contracts::{ToolError, ToolOutput, render};
use tracing::debug;

/// Run `program` to completion and capture both output streams.
///
/// A process that cannot be spawned is a fatal failure; a non-zero exit is
/// retryable and carries the captured output.
pub fn run(program: &Path, args: &[String]) -> Result<ToolOutput, ToolError> {
    let rendered = render(&program.display().to_string(), args);
    debug!("Running: {rendered}");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|error| ToolError::fatal(rendered.clone(), error.to_string()))?;

    let captured = ToolOutput::new(
        rendered.clone(),
        String::from_utf8_lossy(&output.stdout).to_string(),
    )
    .with_stderr(String::from_utf8_lossy(&output.stderr).to_string());
    debug!("{rendered} output: {}", captured.combined());

    if !output.status.success() {
        return Err(ToolError::retryable(
            rendered,
            format!("{} ({})", captured.combined(), output.status),
        ));
    }

    Ok(captured)
}
