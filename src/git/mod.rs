// Git repository accessor
//
// Thin wrapper running the git command line client in a working tree.

pub mod changeset;
pub mod commit;
pub mod config;

pub use changeset::{ChangeState, GitChangeSet};
pub use commit::GitCommit;
pub use config::{GitConfig, GitConfigSetting};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Find the directory containing a `.git` directory from path or its parents
pub fn detect_git_repository_path(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|directory| directory.join(".git").is_dir())
        .map(Path::to_path_buf)
}

/// Run git with arguments in a directory and return stdout lines
pub fn run_git_command<I, S>(directory: &Path, args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let output = Command::new("git")
        .args(args)
        .current_dir(directory)
        .output()
        .map_err(|e| Error::git(format!("Error running git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::git(stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect())
}

/// Git repository working tree
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
}

impl GitRepository {
    /// Open git repository containing path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let root = detect_git_repository_path(path)
            .ok_or_else(|| Error::git(format!("Not a git repository: {}", path.display())))?;
        let repository = Self { path: root };
        repository.validate()?;
        Ok(repository)
    }

    /// Git working tree root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check the path is accepted as a work tree by git
    pub fn validate(&self) -> Result<()> {
        let lines = self.run_git_command(["rev-parse", "--is-inside-work-tree"])?;
        match lines.first().map(String::as_str) {
            Some("true") => Ok(()),
            _ => Err(Error::git(format!(
                "Not a git work tree: {}",
                self.path.display()
            ))),
        }
    }

    pub fn run_git_command<I, S>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        run_git_command(&self.path, args)
    }

    /// Check if the repository has any commits
    pub fn has_commits(&self) -> bool {
        self.run_git_command(["rev-parse", "--verify", "--quiet", "HEAD"])
            .is_ok()
    }

    /// Commit currently checked out
    pub fn head(&self) -> Result<GitCommit> {
        self.get_commit("HEAD")
    }

    /// Load commit details for a revision
    pub fn get_commit(&self, revision: &str) -> Result<GitCommit> {
        GitCommit::load(self, revision)
    }

    /// HEAD revision hash, optionally shortened to a number of characters
    pub fn get_revision(&self, characters: Option<usize>) -> Result<String> {
        let lines = self.run_git_command(["rev-parse", "HEAD"])?;
        let revision = lines
            .into_iter()
            .next()
            .ok_or_else(|| Error::git("git rev-parse returned no revision"))?;
        Ok(match characters {
            Some(count) => revision.chars().take(count).collect(),
            None => revision,
        })
    }

    /// Commit hashes in the reflog, newest first
    pub fn reflog(&self) -> Result<Vec<String>> {
        self.run_git_command(["reflog", "--format=%H"])
    }

    /// Files changed between two revisions
    pub fn get_change_set(&self, start: &str, end: &str) -> Result<GitChangeSet> {
        GitChangeSet::load(self, start, end)
    }

    /// Git configuration visible in the repository
    pub fn config(&self) -> Result<GitConfig> {
        let lines = self.run_git_command(["config", "--show-scope", "--list"])?;
        GitConfig::parse(&lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_git_repository_path() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("src/pkg");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            detect_git_repository_path(&nested).unwrap(),
            dir.path().to_path_buf()
        );
    }

    #[test]
    fn test_detect_ignores_git_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".git"), "gitdir: elsewhere").unwrap();
        let found = detect_git_repository_path(dir.path());
        assert_ne!(found.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_run_git_command_error() {
        let dir = TempDir::new().unwrap();
        let result = run_git_command(dir.path(), ["no-such-git-subcommand"]);
        assert!(matches!(result, Err(Error::Git(_))));
    }
}
