use std::{
    io::ErrorKind,
    path::Path,
    process::{Command, Stdio},
};

use crate::errors::CovError;

#[derive(Clone, Debug, Default)]
pub struct CaptureOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: Option<i32>,
}

impl CaptureOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Runs an external command to completion. `command[0]` is the program.
pub trait CommandExecutor {
    fn execute(&self, command: &[String], cwd: &Path) -> Result<CaptureOutput, CovError>;
}

#[derive(Debug, Default, Clone)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&self, command: &[String], cwd: &Path) -> Result<CaptureOutput, CovError> {
        let (program, args) = command
            .split_first()
            .ok_or(CovError::InvalidArgument("Empty command".to_string()))?;
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    CovError::ToolNotFound(program.clone())
                } else {
                    CovError::from(e)
                }
            })?;

        let stdout = String::from_utf8(strip_ansi_escapes::strip(&output.stdout))?;
        let stderr = String::from_utf8(strip_ansi_escapes::strip(&output.stderr))?;

        Ok(CaptureOutput {
            stdout,
            stderr,
            status: output.status.code(),
        })
    }
}

pub fn display_command(command: &[String]) -> String {
    command.join(" ")
}
