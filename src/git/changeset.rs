use crate::error::{Error, Result};
use crate::git::GitRepository;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Change state of a file reported by `git diff-tree --name-status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeState {
    Unmodified,
    Added,
    Copied,
    Deleted,
    Modified,
    Renamed,
    UpdatedUnmerged,
}

/// States returned by `GitChangeSet::filter` by default
pub const DEFAULT_FILTER_STATES: &[ChangeState] = &[
    ChangeState::Added,
    ChangeState::Copied,
    ChangeState::Modified,
    ChangeState::Renamed,
];

impl ChangeState {
    /// Parse a status letter. Copy and rename statuses carry a score suffix.
    pub fn from_status(status: &str) -> Result<Self> {
        match status.chars().next() {
            Some(' ') => Ok(ChangeState::Unmodified),
            Some('A') => Ok(ChangeState::Added),
            Some('C') => Ok(ChangeState::Copied),
            Some('D') => Ok(ChangeState::Deleted),
            Some('M') => Ok(ChangeState::Modified),
            Some('R') => Ok(ChangeState::Renamed),
            Some('U') => Ok(ChangeState::UpdatedUnmerged),
            _ => Err(Error::git(format!("Unexpected git change status {}", status))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeState::Unmodified => "unmodified",
            ChangeState::Added => "added",
            ChangeState::Copied => "copied",
            ChangeState::Deleted => "deleted",
            ChangeState::Modified => "modified",
            ChangeState::Renamed => "renamed",
            ChangeState::UpdatedUnmerged => "updated_unmerged",
        }
    }
}

impl FromStr for ChangeState {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "unmodified" => Ok(ChangeState::Unmodified),
            "added" => Ok(ChangeState::Added),
            "copied" => Ok(ChangeState::Copied),
            "deleted" => Ok(ChangeState::Deleted),
            "modified" => Ok(ChangeState::Modified),
            "renamed" => Ok(ChangeState::Renamed),
            "updated_unmerged" => Ok(ChangeState::UpdatedUnmerged),
            _ => Err(Error::git(format!("Invalid change state {}", value))),
        }
    }
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Changed files between two revisions
#[derive(Debug, Clone, Default, Serialize)]
pub struct GitChangeSet {
    pub start_revision: String,
    pub end_revision: String,
    changes: BTreeMap<ChangeState, Vec<PathBuf>>,
}

impl GitChangeSet {
    /// Load changes with `git diff-tree`
    pub fn load(repository: &GitRepository, start: &str, end: &str) -> Result<Self> {
        let range = format!("{}..{}", start, end);
        let lines = repository.run_git_command([
            "diff-tree",
            "--no-commit-id",
            "--name-status",
            "-r",
            range.as_str(),
        ])?;
        Self::parse(start, end, &lines)
    }

    /// Parse `--name-status` output lines
    pub fn parse(start: &str, end: &str, lines: &[String]) -> Result<Self> {
        let mut changes: BTreeMap<ChangeState, Vec<PathBuf>> = BTreeMap::new();
        for line in lines.iter().filter(|line| !line.is_empty()) {
            let mut fields = line.split('\t');
            let status = fields.next().unwrap_or_default();
            // Renames and copies list the source and destination path
            let path = fields
                .last()
                .ok_or_else(|| Error::git(format!("Unexpected git change line {}", line)))?;
            let state = ChangeState::from_status(status)?;
            changes.entry(state).or_default().push(PathBuf::from(path));
        }

        Ok(Self {
            start_revision: start.to_string(),
            end_revision: end.to_string(),
            changes,
        })
    }

    /// Files in a change state
    pub fn files(&self, state: ChangeState) -> &[PathBuf] {
        self.changes.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Files in any of the given states, in state order
    pub fn filter(&self, states: &[ChangeState]) -> Vec<PathBuf> {
        states
            .iter()
            .flat_map(|state| self.files(*state).iter().cloned())
            .collect()
    }

    /// Files in the default filter states
    pub fn changed_files(&self) -> Vec<PathBuf> {
        self.filter(DEFAULT_FILTER_STATES)
    }
}

impl fmt::Display for GitChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_revision, self.end_revision)
    }
}
