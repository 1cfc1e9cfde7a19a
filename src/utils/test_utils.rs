use std::cell::RefCell;
use std::fs;
use std::path::Path;

use tempfile::{TempDir, tempdir};

use crate::errors::CovError;
use crate::utils::process::{CaptureOutput, CommandExecutor};

/// Temporary workspace holding empty files at the given relative paths.
pub fn python_project(files: &[&str]) -> TempDir {
    let dir = tempdir().expect("Temp dir should be created");
    for file in files {
        let path = dir.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Parent dir should be created");
        }
        fs::write(&path, "").expect("File should be written");
    }
    dir
}

pub fn exited(status: i32, stdout: &str) -> Result<CaptureOutput, CovError> {
    Ok(CaptureOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        status: Some(status),
    })
}

type Handler = Box<dyn Fn(&[String], &Path) -> Result<CaptureOutput, CovError>>;

/// Records every command and answers with a scripted handler instead of
/// spawning a process.
pub struct ScriptedExecutor {
    pub calls: RefCell<Vec<Vec<String>>>,
    handler: Handler,
}

impl ScriptedExecutor {
    pub fn new(handler: impl Fn(&[String], &Path) -> Result<CaptureOutput, CovError> + 'static) -> Self {
        Self {
            calls: RefCell::new(vec![]),
            handler: Box::new(handler),
        }
    }

    /// Mimics `coverage`: `coverage json` writes `summary` into the workspace,
    /// every other command exits with `status`.
    pub fn coverage(summary: &'static str, status: i32) -> Self {
        Self::new(move |command, cwd| {
            if command.get(1).map(String::as_str) == Some("json") {
                fs::write(cwd.join("coverage.json"), summary)?;
                return exited(0, "Wrote JSON report to coverage.json\n");
            }
            exited(status, "report body\n")
        })
    }

    pub fn recorded(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(&self, command: &[String], cwd: &Path) -> Result<CaptureOutput, CovError> {
        self.calls.borrow_mut().push(command.to_vec());
        (self.handler)(command, cwd)
    }
}
