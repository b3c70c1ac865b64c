use std::path::PathBuf;
use thiserror::Error;

/// pydoctree error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Repository is python module: {0}")]
    RepositoryIsModule(PathBuf),

    #[error("Document generator error: {0}")]
    DocumentGenerator(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("{0}")]
    Detached(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("New version {requested} is smaller or same as previous version {current}")]
    VersionRegression { current: String, requested: String },

    #[error("Error looking up template {0}")]
    TemplateNotFound(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Git error: {0}")]
    Git(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for pydoctree operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a document generator configuration error
    pub fn document_generator(msg: impl Into<String>) -> Self {
        Error::DocumentGenerator(msg.into())
    }

    /// Create an error for an operation only a concrete generator provides
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Error::NotImplemented(msg.into())
    }

    /// Create an error for a file or module without an owner
    pub fn detached(msg: impl Into<String>) -> Self {
        Error::Detached(msg.into())
    }

    /// Create an invalid name error
    pub fn invalid_name(msg: impl Into<String>) -> Self {
        Error::InvalidName(msg.into())
    }

    /// Create an invalid version error
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        Error::InvalidVersion(msg.into())
    }

    /// Create a git error
    pub fn git(msg: impl Into<String>) -> Self {
        Error::Git(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// True for errors raised by abstract generator members
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented(_))
    }
}
