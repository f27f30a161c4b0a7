//! PID file for the running host, used by `sysmenu stop` and `status`.

use std::fs;
use std::path::PathBuf;

use crate::{Error, Result};

/// Returns the path to the sysmenu data directory.
///
/// On Windows: `%LOCALAPPDATA%\sysmenu`
/// Creates the directory if it doesn't exist.
fn data_dir() -> Result<PathBuf> {
    let base = std::env::var("LOCALAPPDATA")
        .map_err(|_| Error::Config("LOCALAPPDATA environment variable not set".into()))?;

    let dir = PathBuf::from(base).join("sysmenu");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the path to the PID file.
pub fn pid_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("sysmenu.pid"))
}

/// Writes the current process's PID to the PID file.
///
/// Only the primary host writes it; a companion started for the other
/// pointer width is owned and stopped by its parent.
pub fn write_pid_file() -> Result<()> {
    fs::write(pid_path()?, std::process::id().to_string())?;
    Ok(())
}

/// Reads the PID from the PID file, if it exists.
pub fn read_pid_file() -> Result<Option<u32>> {
    let path = pid_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let pid = contents
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid PID file contents: {e}")))?;

    Ok(Some(pid))
}

/// Removes the PID file.
pub fn remove_pid_file() -> Result<()> {
    let path = pid_path()?;

    if path.exists() {
        fs::remove_file(&path)?;
    }

    Ok(())
}
