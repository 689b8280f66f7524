use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

const TSC: &str = "tsc";

/// Runs the TypeScript compiler over generated declaration files and
/// returns its diagnostics, one per entry.
pub fn check_typescript<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
    info!("Check syntax for {} file(s)", paths.len());

    let output = Command::new(TSC)
        .arg("--noEmit")
        .args(paths.iter().map(|path| path.as_ref()))
        .output()
        .map_err(|error| Error::Checker(format!("{}: {}", TSC, error)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let diagnostics = parse_diagnostics(&stdout);

    if diagnostics.is_empty() && !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        return Err(Error::Checker(stderr.trim().to_string()));
    }

    Ok(diagnostics)
}

pub fn parse_diagnostics(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.contains("error TS"))
        .map(|line| line.trim().to_string())
        .collect()
}
