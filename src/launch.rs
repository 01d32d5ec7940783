//! Hand files and folders to the operating system's default handler.

use crate::error::{MatchError, Result};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Opens paths outside the process. Failures never touch index state.
pub trait Launcher {
    /// Open a file with its default application.
    fn open(&self, path: &Path) -> Result<()>;

    /// Show the folder containing `path`, selecting it where the platform can.
    fn reveal(&self, path: &Path) -> Result<()>;
}

/// Launcher backed by the platform's `open` / `xdg-open` / `start`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, path: &Path) -> Result<()> {
        open_path_native(path)
    }

    fn reveal(&self, path: &Path) -> Result<()> {
        reveal_path_native(path)
    }
}

fn run(mut command: Command, path: &Path, label: &str) -> Result<()> {
    // Keep helper chatter off the terminal the UI is drawing on
    let status = command
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| MatchError::open_failed(path, format!("failed to run {label}: {e}")))?;
    ensure_success(status, path, label)
}

fn ensure_success(status: ExitStatus, path: &Path, label: &str) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(MatchError::open_failed(
            path,
            format!("{label} failed with status {status}"),
        ))
    }
}

#[cfg(target_os = "macos")]
fn open_path_native(path: &Path) -> Result<()> {
    let mut command = Command::new("open");
    command.arg(path);
    run(command, path, "open")
}

#[cfg(target_os = "macos")]
fn reveal_path_native(path: &Path) -> Result<()> {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    run(command, path, "open -R")
}

#[cfg(target_os = "windows")]
fn open_path_native(path: &Path) -> Result<()> {
    let mut command = Command::new("cmd");
    command.arg("/C").arg("start").arg("").arg(path);
    run(command, path, "start")
}

#[cfg(target_os = "windows")]
fn reveal_path_native(path: &Path) -> Result<()> {
    // explorer exits with 1 even when it succeeds
    let mut arg = std::ffi::OsString::from("/select,");
    arg.push(path);
    Command::new("explorer")
        .arg(arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| MatchError::open_failed(path, format!("failed to run explorer: {e}")))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_path_native(path: &Path) -> Result<()> {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    run(command, path, "xdg-open")
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn reveal_path_native(path: &Path) -> Result<()> {
    let folder = path.parent().unwrap_or(path);
    let mut command = Command::new("xdg-open");
    command.arg(folder);
    run(command, folder, "xdg-open")
}
