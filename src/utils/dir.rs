use std::{env, io, path::PathBuf};

use anyhow::{anyhow, Result};

pub const APPLICATION_NAME: &str = "tasktally";

/// Base directory for per-user state, before the application name is appended.
#[cfg(windows)]
fn state_base(var: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    var("APPDATA")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("APPDATA should be present on Windows"))
}

#[cfg(not(windows))]
fn state_base(var: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(state_home) = var("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(state_home));
    }
    var("HOME")
        .map(|home| PathBuf::from(home).join(".local").join("state"))
        .ok_or_else(|| anyhow!("Neither XDG_STATE_HOME nor HOME is set"))
}

/// Resolves `$XDG_STATE_HOME/tasktally` (falling back to `$HOME/.local/state`) or
/// `%APPDATA%\tasktally` on Windows, creating the directory if needed.
pub fn create_application_default_path() -> Result<PathBuf> {
    let base = state_base(|name| env::var(name).ok())?;
    create_application_path(base.join(APPLICATION_NAME))
}

pub fn create_application_path(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Err(e) if e.kind() != io::ErrorKind::AlreadyExists => {
            Err(anyhow::Error::new(e).context(format!("Failed to create {path:?}")))
        }
        _ => Ok(path),
    }
}
