//! pydoctree - Python repository documentation tree
//!
//! Discovers modules and test modules of a python repository and
//! generates sphinx automodule documentation for them.

pub mod cli;
pub mod config;
pub mod documentation;
pub mod error;
pub mod git;
pub mod python;

// Re-export main types
pub use config::Config;
pub use documentation::{get_processor, TemplateGenerator, TemplateLoader};
pub use error::{Error, Result};
pub use python::{PythonFile, PythonModule, Repository, RepositoryOptions};
