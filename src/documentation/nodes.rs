// Template generator implementations for the repository object graph

use crate::documentation::generator::TemplateGenerator;
use crate::documentation::templates::TemplateLoader;
use crate::error::{Error, Result};
use crate::python::names::INDEX_FILENAME;
use crate::python::{PythonFile, PythonModule, Repository};
use std::path::{Path, PathBuf};
use std::rc::Rc;

const SPHINX_INDEX: &str = "index.rst";

fn repository_loader(repository: Option<Rc<Repository>>) -> Result<TemplateLoader> {
    repository
        .and_then(|repository| repository.loader())
        .ok_or_else(|| Error::not_implemented("template_loader() requires a documentation processor"))
}

fn is_sphinx(repository: Option<Rc<Repository>>) -> bool {
    repository
        .and_then(|repository| repository.loader())
        .map(|loader| loader == TemplateLoader::Sphinx)
        .unwrap_or(false)
}

fn output_filename_not_implemented(item: &dyn std::fmt::Display) -> Error {
    Error::not_implemented(format!("get_output_filename() is not available for {}", item))
}

impl PythonFile {
    fn owning_repository(&self) -> Option<Rc<Repository>> {
        self.module().and_then(|module| module.repository())
    }
}

impl TemplateGenerator for PythonFile {
    fn template_name(&self) -> Option<String> {
        let repository = self.owning_repository()?;
        match repository.loader()? {
            TemplateLoader::Sphinx => Some(repository.configuration().sphinx.templates.file.clone()),
            TemplateLoader::Generic => None,
        }
    }

    fn template_directory(&self) -> Option<PathBuf> {
        self.owning_repository()?.template_directory()
    }

    fn template_loader(&self) -> Result<TemplateLoader> {
        repository_loader(self.owning_repository())
    }

    fn template_context(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.template_data()?)?)
    }

    /// `index.rst` for the module index file, `<name>.rst` otherwise
    fn get_output_filename(&self, directory: &Path) -> Result<PathBuf> {
        if !is_sphinx(self.owning_repository()) {
            return Err(output_filename_not_implemented(self));
        }
        let relative_directory = self
            .relative_directory()
            .ok_or_else(|| output_filename_not_implemented(self))?;
        let filename = if self.is_index() {
            SPHINX_INDEX.to_string()
        } else {
            format!("{}.rst", self.name())
        };
        Ok(directory.join(relative_directory).join(filename))
    }

    fn debug(&self, message: &str) -> Result<()> {
        PythonFile::debug(self, message)
    }

    fn error(&self, message: &str) -> Result<()> {
        PythonFile::error(self, message)
    }

    fn message(&self, message: &str) -> Result<()> {
        PythonFile::message(self, message)
    }
}

impl PythonModule {
    /// Generate documents for module files, and a module index when the
    /// module has no `__init__.py` to document it
    ///
    /// Files in the repository root are linked from the repository index,
    /// which owns the root `index.rst`.
    pub fn generate_module_docs(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for file in self.files() {
            paths.push(file.generate(directory)?);
        }
        if self.index().is_none() && !self.is_repository_root() {
            PythonModule::debug(
                self,
                &format!("{} has no {}, generating module index", self, INDEX_FILENAME),
            )?;
            paths.push(self.generate(directory)?);
        }
        Ok(paths)
    }
}

impl TemplateGenerator for PythonModule {
    fn template_name(&self) -> Option<String> {
        let repository = self.repository()?;
        match repository.loader()? {
            TemplateLoader::Sphinx => Some(repository.configuration().sphinx.templates.module.clone()),
            TemplateLoader::Generic => None,
        }
    }

    fn template_directory(&self) -> Option<PathBuf> {
        self.repository()?.template_directory()
    }

    fn template_loader(&self) -> Result<TemplateLoader> {
        repository_loader(self.repository())
    }

    fn template_context(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.template_data()?)?)
    }

    fn get_output_filename(&self, directory: &Path) -> Result<PathBuf> {
        if !is_sphinx(self.repository()) {
            return Err(output_filename_not_implemented(self));
        }
        let relative_directory = self
            .relative_directory()
            .ok_or_else(|| output_filename_not_implemented(self))?;
        Ok(directory.join(relative_directory).join(SPHINX_INDEX))
    }

    fn debug(&self, message: &str) -> Result<()> {
        PythonModule::debug(self, message)
    }

    fn error(&self, message: &str) -> Result<()> {
        PythonModule::error(self, message)
    }

    fn message(&self, message: &str) -> Result<()> {
        PythonModule::message(self, message)
    }
}

impl Repository {
    /// Configured template directory, relative to the repository root
    pub fn template_directory(&self) -> Option<PathBuf> {
        self.configuration()
            .sphinx
            .template_directory
            .as_ref()
            .map(|directory| self.path().join(directory))
    }

    /// Configured output directory for the template loader
    pub fn default_output_directory(&self) -> PathBuf {
        let config = self.configuration();
        match self.loader() {
            Some(TemplateLoader::Sphinx) => self.path().join(&config.sphinx.document_path),
            _ => self.path().join(&config.documentation.document_path),
        }
    }

    /// Generate documentation to directory, or the default output directory
    pub fn generate_documentation(&self, directory: Option<&Path>) -> Result<PathBuf> {
        let directory = match directory {
            Some(directory) => directory.to_path_buf(),
            None => self.default_output_directory(),
        };
        self.generate(&directory)
    }
}

impl TemplateGenerator for Repository {
    fn template_name(&self) -> Option<String> {
        match self.loader()? {
            TemplateLoader::Sphinx => Some(self.configuration().sphinx.templates.repository.clone()),
            TemplateLoader::Generic => None,
        }
    }

    fn template_directory(&self) -> Option<PathBuf> {
        Repository::template_directory(self)
    }

    fn template_loader(&self) -> Result<TemplateLoader> {
        self.loader()
            .ok_or_else(|| Error::not_implemented("template_loader() requires a documentation processor"))
    }

    fn template_context(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.template_data()?)?)
    }

    fn get_output_filename(&self, directory: &Path) -> Result<PathBuf> {
        if self.loader() != Some(TemplateLoader::Sphinx) {
            return Err(output_filename_not_implemented(self));
        }
        Ok(directory.join(SPHINX_INDEX))
    }

    fn debug(&self, message: &str) -> Result<()> {
        Repository::debug(self, message)
    }

    fn error(&self, message: &str) -> Result<()> {
        Repository::error(self, message)
    }

    fn message(&self, message: &str) -> Result<()> {
        Repository::message(self, message)
    }

    /// Generate documents for all normal modules and the repository index
    fn generate(&self, directory: &Path) -> Result<PathBuf> {
        Repository::message(
            self,
            &format!("generate {} documentation to {}", self, directory.display()),
        )?;
        for module in self.python_modules()? {
            module.generate_module_docs(directory)?;
        }
        self.write_output(directory)
    }
}
