use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Stdio},
};

use log::Level;
use thiserror::Error;

use crate::{logger::FetchLog, model::RepositoryDescriptor};

#[cfg(test)]
use mockall::automock;

pub const DEFAULT_GIT_EXECUTABLE: &str = "git";

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to create directory '{path}': {source}")]
    Creation {
        path: String,
        source: std::io::Error,
    },
    #[error("Target location {path} exists and is not a directory")]
    NotADirectory { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned,
    Failed { diagnostic: String },
}

#[cfg_attr(test, automock)]
pub trait CloneRunner {
    /// Clones `url` as a new subdirectory of `directory`.
    fn clone_repository(&self, url: &str, directory: &Path) -> CloneOutcome;
}

/// Runs `<git> clone <url>` with `directory` as the working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    executable: OsString,
}

impl GitCli {
    pub fn new(executable: impl Into<OsString>) -> Self {
        GitCli {
            executable: executable.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        GitCli::new(DEFAULT_GIT_EXECUTABLE)
    }
}

impl CloneRunner for GitCli {
    fn clone_repository(&self, url: &str, directory: &Path) -> CloneOutcome {
        let output = Command::new(&self.executable)
            .arg("clone")
            .arg(url)
            .current_dir(directory)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => CloneOutcome::Cloned,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
                let diagnostic = if stderr.is_empty() {
                    format!("git exited with {}", output.status)
                } else {
                    stderr
                };
                CloneOutcome::Failed { diagnostic }
            }
            Err(error) => CloneOutcome::Failed {
                diagnostic: format!(
                    "could not run {}: {}",
                    Path::new(&self.executable).display(),
                    error
                ),
            },
        }
    }
}

/// Makes sure `directory` exists, creating it and any missing parents.
pub fn prepare_target_directory(
    directory: &Path,
    log: &dyn FetchLog,
) -> Result<(), DirectoryError> {
    if directory.exists() {
        if !directory.is_dir() {
            return Err(DirectoryError::NotADirectory {
                path: directory.display().to_string(),
            });
        }
        return Ok(());
    }

    match std::fs::create_dir_all(directory) {
        Ok(()) => {
            log.log(
                Level::Info,
                &format!("Created directory: {}", directory.display()),
            );
            Ok(())
        }
        Err(source) => {
            let error = DirectoryError::Creation {
                path: directory.display().to_string(),
                source,
            };
            log.log(Level::Error, &error.to_string());
            Err(error)
        }
    }
}

/// Clones every descriptor into `directory`, one at a time, in order.
///
/// Per-repository problems are logged and never interrupt the loop.
pub fn mirror_repositories(
    directory: &Path,
    repositories: &[RepositoryDescriptor],
    runner: &dyn CloneRunner,
    log: &dyn FetchLog,
) {
    for repository in repositories {
        let url = repository
            .clone_url
            .as_deref()
            .filter(|url| !url.trim().is_empty());
        let Some(url) = url else {
            log.log(
                Level::Warn,
                &format!(
                    "No clone URL found for repository '{}'. Skipping.",
                    repository
                ),
            );
            continue;
        };

        log.log(
            Level::Info,
            &format!("Cloning repository '{}' from {}...", repository, url),
        );
        match runner.clone_repository(url, directory) {
            CloneOutcome::Cloned => {
                log.log(
                    Level::Info,
                    &format!("Successfully cloned '{}'.", repository),
                );
            }
            CloneOutcome::Failed { diagnostic } => {
                log.log(
                    Level::Error,
                    &format!("Error cloning '{}': {}", repository, diagnostic),
                );
            }
        }
    }
}
