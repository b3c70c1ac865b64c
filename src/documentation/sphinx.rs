// Sphinx automodule template data
//
// Values consumed by the sphinx templates: automodule flags, toctree
// entries, captions and toctree depths.

use crate::config::{SphinxConfig, DEFAULT_SPHINX_TOCTREE_DEPTH};
use crate::error::Result;
use crate::python::{PythonFile, PythonModule, Repository};
use serde::Serialize;
use std::path::Path;

/// Template data for a python file
#[derive(Debug, Clone, Serialize)]
pub struct FileContext {
    pub name: String,
    pub path: String,
    pub import_path: String,
    pub is_index: bool,
    pub automodule_flags: Vec<String>,
    pub file_import_paths: Vec<String>,
    pub index_max_depth: usize,
}

/// Template data for a python module index
#[derive(Debug, Clone, Serialize)]
pub struct ModuleContext {
    pub name: String,
    pub import_path: String,
    pub caption: String,
    pub group: String,
    pub index_max_depth: usize,
    pub file_import_paths: Vec<String>,
}

/// Template data for the repository index
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryContext {
    pub name: String,
    pub module_name: String,
    pub index_max_depth: usize,
    pub module_indexes: Vec<String>,
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn stem_relative_to(path: &Path, directory: &Path) -> String {
    let relative = path.strip_prefix(directory).unwrap_or(path);
    slash_path(&relative.with_extension(""))
}

impl PythonFile {
    fn sphinx_config(&self) -> Option<SphinxConfig> {
        let repository = self.module()?.repository()?;
        Some(repository.configuration().sphinx.clone())
    }

    /// Configured automodule flags as `:flag:` options
    pub fn automodule_flags(&self) -> Vec<String> {
        self.sphinx_config()
            .map(|config| {
                config
                    .automodule_flags
                    .iter()
                    .map(|flag| format!(":{}:", flag))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Other files of the module relative to the module directory
    pub fn file_import_paths(&self) -> Vec<String> {
        let module = match self.module() {
            Some(module) => module,
            None => return Vec::new(),
        };
        module
            .files()
            .iter()
            .filter(|item| item.path() != self.path())
            .map(|item| stem_relative_to(item.path(), module.path()))
            .collect()
    }

    pub fn template_data(&self) -> Result<FileContext> {
        let index_max_depth = self
            .sphinx_config()
            .map(|config| config.module_index_max_depth)
            .unwrap_or(DEFAULT_SPHINX_TOCTREE_DEPTH);
        Ok(FileContext {
            name: self.name(),
            path: self.relative_path().map(|p| slash_path(&p)).unwrap_or_default(),
            import_path: self.import_path().unwrap_or_default(),
            is_index: self.is_index(),
            automodule_flags: self.automodule_flags(),
            file_import_paths: self.file_import_paths(),
            index_max_depth,
        })
    }
}

impl PythonModule {
    /// Files of the module relative to the module directory
    pub fn file_import_paths(&self) -> Vec<String> {
        self.files()
            .iter()
            .map(|item| stem_relative_to(item.path(), self.path()))
            .collect()
    }

    /// Module index caption
    pub fn caption(&self) -> String {
        self.relative_directory()
            .map(|path| slash_path(&path))
            .unwrap_or_else(|| self.name())
    }

    /// Module index toctree depth
    pub fn index_max_depth(&self) -> usize {
        self.repository()
            .map(|repository| repository.configuration().sphinx.module_index_max_depth)
            .unwrap_or(DEFAULT_SPHINX_TOCTREE_DEPTH)
    }

    pub fn template_data(&self) -> Result<ModuleContext> {
        Ok(ModuleContext {
            name: self.name(),
            import_path: self.import_path().unwrap_or_default(),
            caption: self.caption(),
            group: self.group().to_string(),
            index_max_depth: self.index_max_depth(),
            file_import_paths: self.file_import_paths(),
        })
    }
}

impl Repository {
    /// Repository index toctree depth
    pub fn index_max_depth(&self) -> usize {
        self.configuration().sphinx.repository_index_max_depth
    }

    /// Documents linked from the repository index
    ///
    /// Module index documents, plus the documents of files placed directly
    /// in the repository root.
    pub fn module_indexes(&self) -> Result<Vec<String>> {
        let mut indexes = Vec::new();
        for module in self.python_modules()?.iter() {
            if module.is_repository_root() {
                indexes.extend(module.file_import_paths());
            } else if let Some(path) = module.relative_directory() {
                indexes.push(slash_path(&path.join("index")));
            }
        }
        Ok(indexes)
    }

    pub fn template_data(&self) -> Result<RepositoryContext> {
        Ok(RepositoryContext {
            name: self.repository_name().to_string(),
            module_name: self.module_name().to_string(),
            index_max_depth: self.index_max_depth(),
            module_indexes: self.module_indexes()?,
        })
    }
}
