//! Git hook installation.
//!
//! Writes small shell shims into `.git/hooks` that call back into the
//! `hookgate` binary.

use serde::Serialize;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{GateError, Result};

/// Hooks installed by [`install_hooks`], with their script contents.
pub const HOOKS: [(&str, &str); 2] = [
    ("pre-commit", include_str!("templates/git-hooks/pre-commit")),
    ("commit-msg", include_str!("templates/git-hooks/commit-msg")),
];

/// What happened to one hook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    Created,
    Replaced,
    /// A hook already existed and `force` was not set.
    SkippedExisting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledHook {
    pub name: &'static str,
    pub path: PathBuf,
    pub status: InstallStatus,
}

/// Install the `pre-commit` and `commit-msg` hooks into
/// `<project_dir>/.git/hooks`.
///
/// Existing hooks are kept unless `force` is set.
///
/// # Errors
///
/// Returns [`GateError::NotARepository`] if the hooks directory is missing,
/// or an IO error if a hook can't be written.
pub fn install_hooks(project_dir: &Path, force: bool) -> Result<Vec<InstalledHook>> {
    let hooks_dir = project_dir.join(".git").join("hooks");
    if !hooks_dir.is_dir() {
        return Err(GateError::NotARepository { path: hooks_dir });
    }

    let mut installed = Vec::with_capacity(HOOKS.len());
    for (name, content) in HOOKS {
        let path = hooks_dir.join(name);
        let existed = path.exists();

        let status = if existed && !force {
            InstallStatus::SkippedExisting
        } else {
            fs::write(&path, content)?;
            #[cfg(unix)]
            {
                let mut perms = fs::metadata(&path)?.permissions();
                perms.set_mode(0o755);
                fs::set_permissions(&path, perms)?;
            }
            if existed {
                InstallStatus::Replaced
            } else {
                InstallStatus::Created
            }
        };

        debug!(hook = name, ?status, "Installed hook");
        installed.push(InstalledHook { name, path, status });
    }

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git/hooks")).unwrap();
        temp
    }

    #[test]
    fn test_install_creates_both_hooks() {
        let temp = repo();
        let installed = install_hooks(temp.path(), false).unwrap();

        assert_eq!(installed.len(), 2);
        assert!(installed.iter().all(|h| h.status == InstallStatus::Created));

        let pre_commit = fs::read_to_string(temp.path().join(".git/hooks/pre-commit")).unwrap();
        assert!(pre_commit.contains("exec hookgate pre-commit"));
        let commit_msg = fs::read_to_string(temp.path().join(".git/hooks/commit-msg")).unwrap();
        assert!(commit_msg.contains("exec hookgate commit-msg \"$1\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_installed_hooks_are_executable() {
        let temp = repo();
        install_hooks(temp.path(), false).unwrap();
        let mode = fs::metadata(temp.path().join(".git/hooks/pre-commit"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_existing_hook_kept_without_force() {
        let temp = repo();
        let path = temp.path().join(".git/hooks/pre-commit");
        fs::write(&path, "#!/bin/sh\necho custom\n").unwrap();

        let installed = install_hooks(temp.path(), false).unwrap();
        assert_eq!(installed[0].status, InstallStatus::SkippedExisting);
        assert_eq!(installed[1].status, InstallStatus::Created);
        assert!(fs::read_to_string(&path).unwrap().contains("custom"));
    }

    #[test]
    fn test_force_replaces_existing_hook() {
        let temp = repo();
        let path = temp.path().join(".git/hooks/pre-commit");
        fs::write(&path, "#!/bin/sh\necho custom\n").unwrap();

        let installed = install_hooks(temp.path(), true).unwrap();
        assert_eq!(installed[0].status, InstallStatus::Replaced);
        assert!(fs::read_to_string(&path).unwrap().contains("hookgate"));
    }

    #[test]
    fn test_not_a_repository() {
        let temp = TempDir::new().unwrap();
        let err = install_hooks(temp.path(), false).unwrap_err();
        assert!(matches!(err, GateError::NotARepository { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
