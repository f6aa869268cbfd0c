//! Locating the `claude` binary.
//!
//! Editors launched from a desktop session rarely inherit the login shell's
//! PATH, so besides PATH this probes the usual install locations and finally
//! asks the login shell, with a short timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CLI_NAME: &str = "claude";

const SHELL_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Well-known directories where the Claude CLI gets installed.
fn well_known_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".claude").join("local"));
        dirs.push(home.join(".local").join("bin"));
        dirs.push(home.join(".npm-global").join("bin"));
        dirs.push(home.join(".bun").join("bin"));
    }

    #[cfg(not(target_os = "windows"))]
    {
        dirs.push(PathBuf::from("/usr/local/bin"));
        dirs.push(PathBuf::from("/opt/homebrew/bin"));
    }

    dirs
}

fn path_dirs() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolve the CLI path: a configured path wins, then PATH and well-known
/// directories, then the login shell. `None` means the user has to set it.
pub async fn resolve_cli_path(configured: &str) -> Option<String> {
    let configured = configured.trim();
    if !configured.is_empty() {
        if !Path::new(configured).exists() {
            tracing::warn!("[CliResolver] Configured CLI path does not exist: {}", configured);
        }
        return Some(configured.to_string());
    }

    let mut candidates = path_dirs();
    candidates.extend(well_known_dirs());

    if let Some(found) = find_in_dirs(CLI_NAME, &candidates) {
        tracing::debug!("[CliResolver] Found {} at {}", CLI_NAME, found.display());
        return Some(found.to_string_lossy().to_string());
    }

    let from_shell = lookup_via_shell(CLI_NAME, SHELL_LOOKUP_TIMEOUT).await;
    match &from_shell {
        Some(path) => {
            tracing::debug!("[CliResolver] Login shell resolved {} to {}", CLI_NAME, path)
        }
        None => tracing::info!("[CliResolver] Could not locate {}", CLI_NAME),
    }
    from_shell
}

/// First `dir/name` that exists as a file.
pub fn find_in_dirs(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let file_names: Vec<String> = if cfg!(target_os = "windows") {
        vec![format!("{}.exe", name), format!("{}.cmd", name), name.to_string()]
    } else {
        vec![name.to_string()]
    };

    dirs.iter()
        .flat_map(|dir| file_names.iter().map(move |file| dir.join(file)))
        .find(|candidate| candidate.is_file())
}

/// Ask the user's login shell where `name` lives. Every failure, including
/// the timeout, yields `None`.
pub async fn lookup_via_shell(name: &str, timeout: Duration) -> Option<String> {
    if cfg!(target_os = "windows") {
        return None;
    }

    let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    let mut cmd = tokio::process::Command::new(&shell);
    cmd.arg("-lc")
        .arg(format!("command -v {}", name))
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout, cmd.output()).await.ok()?.ok()?;
    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .rfind(|line| line.starts_with('/'))
        .map(str::to_string)
}
