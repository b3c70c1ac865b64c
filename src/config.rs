use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file looked up in the repository root
pub const REPOSITORY_CONFIGURATION: &str = ".pydoctree.toml";

/// Default output directory for generic documentation
pub const DEFAULT_DOCUMENTS_PATH: &str = "docs";

/// Default output directory for sphinx automodule documentation
pub const DEFAULT_SPHINX_AUTODOC_PATH: &str = "docs/code";

/// Default sphinx toctree depth
pub const DEFAULT_SPHINX_TOCTREE_DEPTH: usize = 2;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns excluded from repository traversal
    pub ignored_directories: Vec<String>,
    /// Directory names that mark test modules
    pub test_directories: Vec<String>,
    pub documentation: DocumentationConfig,
    pub sphinx: SphinxConfig,
}

/// Common documentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    pub document_path: PathBuf,
}

/// Sphinx automodule generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SphinxConfig {
    pub document_path: PathBuf,
    pub template_directory: Option<PathBuf>,
    pub templates: TemplateNames,
    pub repository_index_max_depth: usize,
    pub module_index_max_depth: usize,
    pub automodule_flags: Vec<String>,
}

/// Template names per documented node kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateNames {
    pub repository: String,
    pub module: String,
    pub file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_directories: vec![
                ".eggs/".to_string(),
                ".pytest_cache/".to_string(),
                "__pycache__/".to_string(),
                ".git/".to_string(),
                ".tox/".to_string(),
                ".venv/".to_string(),
                "*.egg-info/".to_string(),
                "dist/".to_string(),
                "build/".to_string(),
                "public/".to_string(),
                "docs/".to_string(),
            ],
            test_directories: vec!["tests".to_string()],
            documentation: DocumentationConfig::default(),
            sphinx: SphinxConfig::default(),
        }
    }
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_DOCUMENTS_PATH),
        }
    }
}

impl Default for SphinxConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_SPHINX_AUTODOC_PATH),
            template_directory: None,
            templates: TemplateNames::default(),
            repository_index_max_depth: DEFAULT_SPHINX_TOCTREE_DEPTH,
            module_index_max_depth: DEFAULT_SPHINX_TOCTREE_DEPTH,
            automodule_flags: vec![
                "members".to_string(),
                "undoc-members".to_string(),
                "inherited-members".to_string(),
            ],
        }
    }
}

impl Default for TemplateNames {
    fn default() -> Self {
        Self {
            repository: "repository_index".to_string(),
            module: "module_index".to_string(),
            file: "automodule".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the repository configuration file, or defaults when the
    /// repository has none
    pub fn for_repository(root: &Path) -> Result<Self> {
        let path = root.join(REPOSITORY_CONFIGURATION);
        if path.is_file() {
            log::debug!("loading configuration {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, excluded: Vec<String>) {
        for pattern in excluded {
            if !self.ignored_directories.contains(&pattern) {
                self.ignored_directories.push(pattern);
            }
        }
    }

    /// Check if directory name is configured as a test directory
    pub fn is_test_directory(&self, name: &str) -> bool {
        self.test_directories.iter().any(|item| item == name)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sphinx.repository_index_max_depth == 0 {
            return Err(Error::config_validation(
                "repository_index_max_depth must be at least 1",
            ));
        }

        if self.sphinx.module_index_max_depth == 0 {
            return Err(Error::config_validation(
                "module_index_max_depth must be at least 1",
            ));
        }

        let templates = &self.sphinx.templates;
        if templates.repository.is_empty() || templates.module.is_empty() || templates.file.is_empty() {
            return Err(Error::config_validation("template names can't be empty"));
        }

        Ok(())
    }
}
