// Python source file model
//
// A file holds a weak link to the module that loaded it. Paths relative to
// the repository and import paths are only known for attached files.

use crate::error::{Error, Result};
use crate::python::module::PythonModule;
use crate::python::names::INDEX_FILENAME;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// Contents written to files created by pydoctree
pub const EMPTY_FILE: &str = "\"\"\"\nAutomatically generated file\n\"\"\"\n";

/// Python code file
#[derive(Debug)]
pub struct PythonFile {
    path: PathBuf,
    module: Weak<PythonModule>,
    /// True if this file is the module index `__init__.py`
    pub module_root: bool,
}

impl PythonFile {
    /// Create a file not linked to any module
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_module(path, Weak::new())
    }

    /// Create a file linked to a module
    pub(crate) fn with_module(path: impl Into<PathBuf>, module: Weak<PythonModule>) -> Self {
        let path = path.into();
        let module_root = path.file_name().map(|n| n == INDEX_FILENAME).unwrap_or(false);
        Self {
            path,
            module,
            module_root,
        }
    }

    /// Write a stub python file to disk unless it already exists
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        write_stub(&path)?;
        Ok(Self::new(path))
    }

    /// Absolute path to the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Module this file belongs to
    pub fn module(&self) -> Option<Rc<PythonModule>> {
        self.module.upgrade()
    }

    /// Path relative to the repository root
    pub fn relative_path(&self) -> Option<PathBuf> {
        let module = self.module()?;
        let repository = module.repository()?;
        self.path
            .strip_prefix(repository.path())
            .ok()
            .map(Path::to_path_buf)
    }

    /// Parent directory relative to the repository root
    pub fn relative_directory(&self) -> Option<PathBuf> {
        self.relative_path()
            .map(|path| path.parent().map(Path::to_path_buf).unwrap_or_default())
    }

    /// Dotted import path of the file
    ///
    /// The index file of a module has the import path of its directory.
    pub fn import_path(&self) -> Option<String> {
        let path = self.relative_path()?;
        let path = if self.is_index() {
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            path.with_extension("")
        };
        Some(dotted(&path))
    }

    /// Check if this file is the module index file `__init__.py`
    pub fn is_index(&self) -> bool {
        self.path.file_name().map(|n| n == INDEX_FILENAME).unwrap_or(false)
    }

    /// Check if this file is the index of a top level module
    pub fn is_module_index(&self) -> Result<bool> {
        if !self.is_index() {
            return Ok(false);
        }
        match self.module() {
            Some(module) => Ok(module.parent()?.map(|p| p.is_repository()).unwrap_or(false)),
            None => Ok(false),
        }
    }

    /// File name without extension
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn linked_module(&self) -> Result<Rc<PythonModule>> {
        self.module()
            .ok_or_else(|| Error::detached("File not linked to a module"))
    }

    /// Pass debug message to the module
    pub fn debug(&self, message: &str) -> Result<()> {
        self.linked_module()?.debug(message)
    }

    /// Pass error message to the module
    pub fn error(&self, message: &str) -> Result<()> {
        self.linked_module()?.error(message)
    }

    /// Pass message to the module
    pub fn message(&self, message: &str) -> Result<()> {
        self.linked_module()?.message(message)
    }
}

impl fmt::Display for PythonFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.import_path() {
            Some(_) if self.is_index() => write!(f, "{}", INDEX_FILENAME),
            Some(import_path) => write!(f, "{}", import_path),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// Join path components with dots
pub(crate) fn dotted(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(".")
}

pub(crate) fn write_stub(path: &Path) -> Result<()> {
    if !path.is_file() {
        fs::write(path, EMPTY_FILE)?;
    }
    Ok(())
}
