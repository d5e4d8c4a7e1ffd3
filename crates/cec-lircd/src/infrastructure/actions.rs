//! Runs the user-configured shell commands for power transitions.
//!
//! Each command is handed to `sh -c` and waited for on the dispatch thread,
//! so later commands execute only after it finishes.

use std::process::Command as Process;

use tracing::debug;

use crate::application::ports::{ActionError, ActionRunner};

/// [`ActionRunner`] backed by `/bin/sh`.
#[derive(Debug, Clone)]
pub struct ShellActionRunner {
    shell: String,
}

impl Default for ShellActionRunner {
    fn default() -> Self {
        Self { shell: "sh".to_string() }
    }
}

impl ShellActionRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `shell` instead of `sh`.  It is invoked as `<shell> -c <command>`.
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }
}

impl ActionRunner for ShellActionRunner {
    fn run(&self, label: &str, command: &str) -> Result<(), ActionError> {
        let status = Process::new(&self.shell)
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|source| ActionError::Spawn {
                label: label.to_string(),
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            debug!(label, command, "action finished");
            Ok(())
        } else {
            Err(ActionError::Failed {
                label: label.to_string(),
                command: command.to_string(),
                status: status.to_string(),
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
