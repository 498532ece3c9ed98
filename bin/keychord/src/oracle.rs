//! Live host-shell conflict oracle.

use std::process::Command;

use keychord_core::{ConflictOracle, Error, Result};
use tracing::debug;

use crate::render::sh_quote;

/// Probes the host environment for names that are already meaningful:
/// executables on `PATH`, shell functions, aliases, builtins, and keywords.
///
/// `PATH` is checked directly; everything else goes through an interactive
/// `type` query so user rc files (where aliases and functions live) are
/// loaded. Read-only; answers are stable for the lifetime of one run.
pub struct ShellOracle {
	shell: String,
}

impl ShellOracle {
	pub fn new(shell: impl Into<String>) -> Self {
		Self { shell: shell.into() }
	}
}

impl ConflictOracle for ShellOracle {
	fn is_taken(&self, name: &str) -> Result<bool> {
		if name.is_empty() {
			return Ok(false);
		}
		if which::which(name).is_ok() {
			debug!(name, "oracle.path_hit");
			return Ok(true);
		}

		let output = Command::new(&self.shell)
			.arg("-i")
			.arg("-c")
			.arg(format!("type {}", sh_quote(name)))
			.output()
			.map_err(|error| Error::Oracle {
				name: name.to_string(),
				reason: format!("failed to run {}: {error}", self.shell),
			})?;

		// zsh reports missing names as "<name> not found" on stdout; other
		// shells may print nothing there and fail the query instead.
		let stdout = String::from_utf8_lossy(&output.stdout);
		let free = stdout.trim_end().ends_with("not found") || (stdout.trim().is_empty() && !output.status.success());
		if !free {
			debug!(name, answer = %stdout.trim_end(), "oracle.shell_hit");
		}
		Ok(!free)
	}
}
