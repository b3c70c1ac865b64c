// Python module model
//
// A module is one directory of a repository holding python files. Files
// are loaded from the immediate children of the directory only; nested
// directories are separate modules.

use crate::error::{Error, Result};
use crate::python::file::{dotted, write_stub, PythonFile};
use crate::python::names::INDEX_FILENAME;
use crate::python::repository::{Repository, REPOSITORY_ROOT_IGNORED_FILES};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// Group of a module in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModuleGroup {
    /// Normal code modules
    #[default]
    Modules,
    /// Test code modules
    Tests,
}

impl ModuleGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleGroup::Modules => "modules",
            ModuleGroup::Tests => "tests",
        }
    }
}

impl fmt::Display for ModuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enclosing item of a module
#[derive(Debug, Clone)]
pub enum ModuleParent {
    /// A registered module in the parent directory
    Module(Rc<PythonModule>),
    /// No module is registered for the parent directory
    Repository(Rc<Repository>),
}

impl ModuleParent {
    pub fn is_repository(&self) -> bool {
        matches!(self, ModuleParent::Repository(_))
    }

    pub fn as_module(&self) -> Option<&Rc<PythonModule>> {
        match self {
            ModuleParent::Module(module) => Some(module),
            ModuleParent::Repository(_) => None,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ModuleParent::Module(module) => module.path(),
            ModuleParent::Repository(repository) => repository.path(),
        }
    }
}

/// Python module directory in a repository
#[derive(Debug)]
pub struct PythonModule {
    path: PathBuf,
    repository: Weak<Repository>,
    group: ModuleGroup,
    self_ref: Weak<PythonModule>,
    files: RefCell<Vec<Rc<PythonFile>>>,
}

impl PythonModule {
    /// Load a module that is not linked to any repository
    pub fn open(path: impl Into<PathBuf>) -> Result<Rc<Self>> {
        Self::attached(path, Weak::new(), ModuleGroup::default())
    }

    /// Load a module linked to a repository
    pub(crate) fn attached(
        path: impl Into<PathBuf>,
        repository: Weak<Repository>,
        group: ModuleGroup,
    ) -> Result<Rc<Self>> {
        let path = path.into();
        let module = Rc::new_cyclic(|self_ref| Self {
            path,
            repository,
            group,
            self_ref: self_ref.clone(),
            files: RefCell::new(Vec::new()),
        });
        module.load_files()?;
        Ok(module)
    }

    /// Create module directory under the repository with an index file
    pub fn create_module(
        path: &Path,
        repository: &Rc<Repository>,
        group: ModuleGroup,
    ) -> Result<Rc<Self>> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            repository.path().join(path)
        };

        if !path.starts_with(repository.path()) {
            return Err(Error::other(format!(
                "create_module() path {} is not under {}",
                path.display(),
                repository.path().display()
            )));
        }
        if path.exists() && !path.is_dir() {
            return Err(Error::other(format!(
                "create_module() path is not directory: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            repository.debug(&format!("create module directory {}", path.display()))?;
            fs::create_dir_all(&path)?;
        }

        let module = Self::attached(path, Rc::downgrade(repository), group)?;
        module.create_file(INDEX_FILENAME)?;
        Ok(module)
    }

    /// Module directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Module directory name
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Repository owning this module
    pub fn repository(&self) -> Option<Rc<Repository>> {
        self.repository.upgrade()
    }

    pub fn group(&self) -> ModuleGroup {
        self.group
    }

    /// Python files loaded by the last `load_files` call
    pub fn files(&self) -> Vec<Rc<PythonFile>> {
        self.files.borrow().clone()
    }

    /// Reload python files from the module directory
    pub fn load_files(&self) -> Result<()> {
        let repository_root = self.is_repository_root();
        let mut paths = Vec::new();
        if self.path.is_dir() {
            for entry in fs::read_dir(&self.path)? {
                let path = entry?.path();
                let is_python = path.extension().map(|e| e == "py").unwrap_or(false);
                if !is_python || !path.is_file() || path.parent() != Some(self.path.as_path()) {
                    continue;
                }
                if repository_root && is_root_ignored_file(&path) {
                    continue;
                }
                paths.push(path);
            }
        }
        paths.sort();

        let files = paths
            .into_iter()
            .map(|path| Rc::new(PythonFile::with_module(path, self.self_ref.clone())))
            .collect();
        *self.files.borrow_mut() = files;
        Ok(())
    }

    /// Create a python file in the module and reload files
    ///
    /// The `.py` extension is added when missing.
    pub fn create_file(&self, name: &str) -> Result<Rc<PythonFile>> {
        let stem = name.strip_suffix(".py").unwrap_or(name);
        let path = self.path.join(format!("{}.py", stem));
        write_stub(&path)?;
        self.load_files()?;

        self.files
            .borrow()
            .iter()
            .find(|file| file.path() == path)
            .cloned()
            .ok_or_else(|| Error::other(format!("Error creating file {}", path.display())))
    }

    /// Module index file `__init__.py`
    pub fn index(&self) -> Option<Rc<PythonFile>> {
        self.files.borrow().iter().find(|file| file.is_index()).cloned()
    }

    /// Directory relative to the repository root
    pub fn relative_directory(&self) -> Option<PathBuf> {
        let repository = self.repository()?;
        self.path
            .strip_prefix(repository.path())
            .ok()
            .map(Path::to_path_buf)
    }

    /// Dotted import path of the module
    pub fn import_path(&self) -> Option<String> {
        self.relative_directory().map(|path| dotted(&path))
    }

    /// Check if this module holds files placed directly in the repository root
    pub fn is_repository_root(&self) -> bool {
        self.relative_directory()
            .map(|path| path.as_os_str().is_empty())
            .unwrap_or(false)
    }

    /// Enclosing module, or the repository when no module is registered for
    /// the parent directory. None for modules without a repository.
    pub fn parent(&self) -> Result<Option<ModuleParent>> {
        let repository = match self.repository() {
            Some(repository) => repository,
            None => return Ok(None),
        };

        let parent_directory = self
            .path
            .parent()
            .and_then(|parent| parent.strip_prefix(repository.path()).ok());
        if let Some(relative) = parent_directory {
            if let Some(module) = repository.module_by_relative_path(relative)? {
                return Ok(Some(ModuleParent::Module(module)));
            }
        }
        Ok(Some(ModuleParent::Repository(repository)))
    }

    fn linked_repository(&self) -> Result<Rc<Repository>> {
        self.repository()
            .ok_or_else(|| Error::detached("Module not linked to a repository"))
    }

    /// Pass debug message to the repository
    pub fn debug(&self, message: &str) -> Result<()> {
        self.linked_repository()?.debug(message)
    }

    /// Pass error message to the repository
    pub fn error(&self, message: &str) -> Result<()> {
        self.linked_repository()?.error(message)
    }

    /// Pass message to the repository
    pub fn message(&self, message: &str) -> Result<()> {
        self.linked_repository()?.message(message)
    }
}

impl fmt::Display for PythonModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relative_directory() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

fn is_root_ignored_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            REPOSITORY_ROOT_IGNORED_FILES
                .iter()
                .any(|ignored| name == *ignored)
        })
        .unwrap_or(false)
}
