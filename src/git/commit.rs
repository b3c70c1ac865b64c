use crate::error::{Error, Result};
use crate::git::{GitChangeSet, GitRepository};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

// ASCII unit separator between formatted fields
const FIELD_SEPARATOR: char = '\u{1f}';
const SHOW_FORMAT: &str = "--format=%H%x1f%T%x1f%an%x1f%ae%x1f%at%x1f%ct%x1f%D%x1f%s";

/// Details of a git commit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GitCommit {
    pub revision: String,
    pub commit_hash: String,
    pub tree_hash: String,
    pub author_name: String,
    pub author_email: String,
    pub author_timestamp: i64,
    pub author_date: DateTime<Utc>,
    pub commit_message: String,
    pub commit_timestamp: i64,
    pub commit_date: DateTime<Utc>,
    pub ref_names: Vec<String>,
}

impl GitCommit {
    /// Load commit details with `git show`
    pub fn load(repository: &GitRepository, revision: &str) -> Result<Self> {
        let lines = repository.run_git_command([
            "show",
            "--no-notes",
            "--no-patch",
            SHOW_FORMAT,
            revision,
        ])?;
        let line = lines
            .first()
            .ok_or_else(|| Error::git(format!("No output for revision {}", revision)))?;
        Self::parse(revision, line)
    }

    /// Parse one line of formatted `git show` output
    pub fn parse(revision: &str, line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.splitn(8, FIELD_SEPARATOR).collect();
        if fields.len() != 8 {
            return Err(Error::git(format!("Unexpected git show output: {}", line)));
        }

        let author_timestamp = parse_timestamp(fields[4])?;
        let commit_timestamp = parse_timestamp(fields[5])?;
        let ref_names = fields[6]
            .split(", ")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            revision: revision.to_string(),
            commit_hash: fields[0].to_string(),
            tree_hash: fields[1].to_string(),
            author_name: fields[2].to_string(),
            author_email: fields[3].to_string(),
            author_timestamp,
            author_date: timestamp_date(author_timestamp)?,
            commit_message: fields[7].to_string(),
            commit_timestamp,
            commit_date: timestamp_date(commit_timestamp)?,
            ref_names,
        })
    }

    /// Files changed compared to a revision, by default the parent commit
    pub fn get_change_set(
        &self,
        repository: &GitRepository,
        revision: Option<&str>,
    ) -> Result<GitChangeSet> {
        let parent = format!("{}~1", self.revision);
        let revision = revision.unwrap_or(&parent);
        repository.get_change_set(&self.revision, revision)
    }
}

fn parse_timestamp(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::git(format!("Invalid timestamp: {}", value)))
}

fn timestamp_date(timestamp: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| Error::git(format!("Invalid timestamp: {}", timestamp)))
}
