//! Opening saved reports with the platform's default PDF handler.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use thiserror::Error;

/// Errors raised while handing a saved report to the system viewer.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The path to open does not exist or is not a regular file.
    #[error("report file not found at {0}")]
    MissingFile(PathBuf),
    /// The platform launcher could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// The launcher program that failed to start.
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The platform launcher ran but reported failure, typically because no
    /// default handler is registered for the PDF media type.
    #[error("'{program}' exited with {status}; no PDF viewer may be registered")]
    HandlerFailed {
        /// The launcher program that reported failure.
        program: String,
        /// The launcher's exit status.
        status: std::process::ExitStatus,
    },
}

/// Opens a file with the host's default handler.
pub trait Viewer {
    /// Opens the file at `path`, surfacing launcher failures as errors.
    fn open(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Launches the platform default viewer through the OS open command.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemViewer;

impl SystemViewer {
    /// Creates a new system viewer.
    pub fn new() -> Self {
        Self
    }
}

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> Result<(), LaunchError> {
        if !path.is_file() {
            return Err(LaunchError::MissingFile(path.to_path_buf()));
        }

        let mut command = open_command(path);
        let program = command.get_program().to_string_lossy().into_owned();
        debug!("opening {} with '{}'", path.display(), program);

        let status = command
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::HandlerFailed { program, status })
        }
    }
}

#[cfg(target_os = "macos")]
fn open_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(windows)]
fn open_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

#[cfg(test)]
mod tests {
    use super::{LaunchError, SystemViewer, Viewer};
    use std::path::Path;

    #[test]
    fn missing_file_is_rejected_before_launch() {
        let viewer = SystemViewer::new();
        let result = viewer.open(Path::new("/nonexistent/CarReport_missing.pdf"));
        assert!(matches!(result, Err(LaunchError::MissingFile(_))));
    }
}
