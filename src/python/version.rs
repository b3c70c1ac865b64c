// Python package version metadata

use crate::error::{Error, Result};
use crate::python::names::{validate_module_name, INDEX_FILENAME};
use crate::python::repository::Repository;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::OnceLock;

/// Version reported for repositories without version metadata
pub const DUMMY_VERSION: &str = "0.0";

/// Poetry project file in the repository root
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

fn version_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^__version__\s*=\s*['"](?P<version>[0-9a-zA-Z.+-]+)['"].*$"#).unwrap()
    })
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?x)^v?
            (?P<release>\d+(?:\.\d+)*)
            (?:[-_.]?(?P<pre_kind>a|alpha|b|beta|c|rc|pre|preview)[-_.]?(?P<pre>\d*))?
            (?:[-_.]?(?:post|rev|r)[-_.]?(?P<post>\d*))?
            (?:[-_.]?dev[-_.]?(?P<dev>\d*))?
            $",
        )
        .unwrap()
    })
}

/// Pre-release phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha,
    Beta,
    Candidate,
}

impl PreRelease {
    fn parse(value: &str) -> Self {
        match value {
            "a" | "alpha" => PreRelease::Alpha,
            "b" | "beta" => PreRelease::Beta,
            _ => PreRelease::Candidate,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::Candidate => "rc",
        }
    }
}

/// Release version with PEP 440 style ordering
///
/// Trailing zeros in the release segment are not significant and
/// pre-releases and development releases sort before the release.
#[derive(Debug, Clone)]
pub struct Version {
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
}

impl Version {
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    fn release_key(&self) -> Vec<u64> {
        let mut release = self.release.clone();
        while release.len() > 1 && release.last() == Some(&0) {
            release.pop();
        }
        release
    }

    // Ordering of the pre-release segment: dev-only releases sort first,
    // final releases last.
    fn pre_key(&self) -> (u8, Option<(PreRelease, u64)>) {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => (0, None),
            (Some(pre), _, _) => (1, Some(pre)),
            _ => (2, None),
        }
    }

    fn dev_key(&self) -> (u8, u64) {
        match self.dev {
            Some(dev) => (0, dev),
            None => (1, 0),
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim().to_lowercase();
        let captures = version_pattern()
            .captures(&value)
            .ok_or_else(|| Error::invalid_version(format!("Invalid version: '{}'", value)))?;

        let number = |name: &str| -> Result<Option<u64>> {
            match captures.name(name) {
                Some(m) if m.as_str().is_empty() => Ok(Some(0)),
                Some(m) => m
                    .as_str()
                    .parse()
                    .map(Some)
                    .map_err(|_| Error::invalid_version(format!("Invalid version: '{}'", value))),
                None => Ok(None),
            }
        };

        let release = captures["release"]
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::invalid_version(format!("Invalid version: '{}'", value)))?;

        let pre = match captures.name("pre_kind") {
            Some(kind) => Some((PreRelease::parse(kind.as_str()), number("pre")?.unwrap_or(0))),
            None => None,
        };

        Ok(Self {
            release,
            pre,
            post: number("post")?,
            dev: number("dev")?,
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release_key()
            .cmp(&other.release_key())
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((kind, number)) = self.pre {
            write!(f, "{}{}", kind.as_str(), number)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        Ok(())
    }
}

/// Where the package version was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// `[tool.poetry] version` in pyproject.toml
    Pyproject,
    /// `__version__` line in the main module index file
    ModuleIndex,
    /// No version metadata found
    Default,
}

/// Version of the main python package in a repository
#[derive(Debug, Clone)]
pub struct PythonPackageVersion {
    repository: Rc<Repository>,
    main_module_name: String,
    version: Version,
    source: VersionSource,
}

impl PythonPackageVersion {
    /// Load package version for the repository
    pub fn load(repository: &Rc<Repository>) -> Result<Self> {
        let main_module_name = repository.module_name().to_string();
        let (value, source) = match read_pyproject_version(repository)? {
            Some(value) => (value, VersionSource::Pyproject),
            None => match read_module_version(repository, &main_module_name)? {
                Some(value) => (value, VersionSource::ModuleIndex),
                None => (DUMMY_VERSION.to_string(), VersionSource::Default),
            },
        };
        log::debug!("{} version {} from {:?}", repository, value, source);

        Ok(Self {
            repository: Rc::clone(repository),
            main_module_name,
            version: value.parse()?,
            source,
        })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn source(&self) -> VersionSource {
        self.source
    }

    pub fn main_module_name(&self) -> &str {
        &self.main_module_name
    }

    /// Check if the version is the placeholder for missing metadata
    pub fn is_dummy(&self) -> bool {
        self.source == VersionSource::Default
    }

    /// Write a new version to the `__version__` line of the main module index
    pub fn update_module_version(&mut self, value: &str) -> Result<()> {
        let version: Version = value.parse()?;
        if !self.is_dummy() && version <= self.version {
            return Err(Error::VersionRegression {
                current: self.version.to_string(),
                requested: version.to_string(),
            });
        }

        let module_name = validate_module_name(&self.main_module_name, false, false)?;
        let module = self
            .repository
            .get_python_module(&module_name)?
            .ok_or_else(|| {
                Error::other(format!("Repository has no main module {}", module_name))
            })?;
        let index = match module.index() {
            Some(index) => index,
            None => module.create_file(INDEX_FILENAME)?,
        };

        let version_line = format!("__version__ = '{}'", version);
        let contents = fs::read_to_string(index.path())?;
        let mut replaced = false;
        let mut lines: Vec<String> = contents
            .lines()
            .map(|line| {
                if version_line_pattern().is_match(line) {
                    replaced = true;
                    version_line.clone()
                } else {
                    line.trim_end().to_string()
                }
            })
            .collect();
        if !replaced {
            lines.push(version_line);
        }
        fs::write(index.path(), format!("{}\n", lines.join("\n")))?;
        module.message(&format!("updated {} version to {}", module_name, version))?;

        self.version = version;
        self.source = VersionSource::ModuleIndex;
        Ok(())
    }
}

impl fmt::Display for PythonPackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

fn read_pyproject_version(repository: &Repository) -> Result<Option<String>> {
    let path = repository.path().join(PYPROJECT_FILENAME);
    if !path.is_file() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path)?;
    let document: toml::Value = toml::from_str(&contents)?;
    Ok(document
        .get("tool")
        .and_then(|tool| tool.get("poetry"))
        .and_then(|poetry| poetry.get("version"))
        .and_then(|version| version.as_str())
        .map(str::to_string))
}

fn read_module_version(repository: &Repository, module_name: &str) -> Result<Option<String>> {
    if validate_module_name(module_name, false, false).is_err() {
        return Ok(None);
    }
    let index = match repository.get_python_module(module_name)? {
        Some(module) => module.index(),
        None => None,
    };
    let index = match index {
        Some(index) => index,
        None => return Ok(None),
    };

    let contents = fs::read_to_string(index.path())?;
    Ok(contents.lines().find_map(|line| {
        version_line_pattern()
            .captures(line)
            .map(|captures| captures["version"].to_string())
    }))
}
