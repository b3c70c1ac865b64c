// Python repository model
//
// Walks the repository tree, turns every directory holding python files
// into a module and classifies modules as normal or test modules. The
// discovery result is memoized until `reload` or `detect_python_modules`
// is called.

use crate::config::Config;
use crate::documentation::TemplateLoader;
use crate::error::{Error, Result};
use crate::git::GitRepository;
use crate::python::file::PythonFile;
use crate::python::module::{ModuleGroup, PythonModule};
use crate::python::names::{get_module_path_components, is_python_module_directory, underscore};
use crate::python::version::PythonPackageVersion;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use walkdir::WalkDir;

/// Filenames ignored in repository root directory
pub const REPOSITORY_ROOT_IGNORED_FILES: &[&str] = &["setup.py"];

/// Number of characters in a short git revision
pub const GIT_REVISION_CHARACTERS: usize = 8;

/// Options for opening a repository
#[derive(Debug, Clone, Default)]
pub struct RepositoryOptions {
    /// Repository name, defaults to the directory name
    pub name: Option<String>,
    /// Glob patterns excluded in addition to configured ignored directories
    pub excluded: Vec<String>,
    /// Configuration, loaded from the repository when not given
    pub configuration: Option<Config>,
    /// Template loader for documentation generation
    pub template_loader: Option<TemplateLoader>,
    /// Create the repository directory if it does not exist
    pub create_missing: bool,
}

impl RepositoryOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_excluded<I, S>(mut self, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(excluded.into_iter().map(Into::into));
        self
    }

    pub fn with_configuration(mut self, configuration: Config) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_template_loader(mut self, loader: TemplateLoader) -> Self {
        self.template_loader = Some(loader);
        self
    }

    pub fn with_create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

/// Memoized result of one discovery pass
#[derive(Debug, Default)]
struct Discovery {
    modules: Vec<Rc<PythonModule>>,
    test_modules: Vec<Rc<PythonModule>>,
    module_index: HashMap<String, Rc<PythonModule>>,
}

impl Discovery {
    fn register(&mut self, module: Rc<PythonModule>, key: String) {
        let group = match module.group() {
            ModuleGroup::Modules => &mut self.modules,
            ModuleGroup::Tests => &mut self.test_modules,
        };
        if !group.iter().any(|item| item.path() == module.path()) {
            group.push(Rc::clone(&module));
        }
        self.module_index.entry(key).or_insert(module);
    }
}

/// Repository of python code
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    repository_name: String,
    module_name: String,
    excluded: Vec<String>,
    excluded_patterns: Vec<glob::Pattern>,
    configuration: Config,
    template_loader: Option<TemplateLoader>,
    self_ref: Weak<Repository>,
    discovery: RefCell<Option<Discovery>>,
}

impl Repository {
    /// Open repository in path
    ///
    /// Fails if the path is itself a python module directory.
    pub fn open(path: impl AsRef<Path>, options: RepositoryOptions) -> Result<Rc<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            if !options.create_missing {
                return Err(Error::PathNotFound(path.to_path_buf()));
            }
            fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        if is_python_module_directory(&path) {
            return Err(Error::RepositoryIsModule(path));
        }

        let mut configuration = match options.configuration {
            Some(configuration) => configuration,
            None => Config::for_repository(&path)?,
        };
        configuration.validate()?;
        configuration.merge_cli(options.excluded);
        let excluded = configuration.ignored_directories.clone();
        let excluded_patterns = excluded
            .iter()
            .map(|pattern| glob::Pattern::new(pattern.trim_end_matches('/')))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let directory_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let repository_name = options.name.unwrap_or(directory_name);
        let module_name = underscore(&repository_name);

        Ok(Rc::new_cyclic(|self_ref| Self {
            path,
            repository_name,
            module_name,
            excluded,
            excluded_patterns,
            configuration,
            template_loader: options.template_loader,
            self_ref: self_ref.clone(),
            discovery: RefCell::new(None),
        }))
    }

    /// Absolute repository root path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    /// Main python module name derived from the repository name
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Excluded path patterns
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn configuration(&self) -> &Config {
        &self.configuration
    }

    /// Template loader used for documentation generation
    pub fn loader(&self) -> Option<TemplateLoader> {
        self.template_loader
    }

    /// Check if a path under the repository matches an excluded pattern
    pub fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.path).unwrap_or(path);
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.excluded_patterns
            .iter()
            .any(|pattern| pattern.matches(name) || pattern.matches_path(relative))
    }

    /// Find directories containing python files, ordered by path
    pub fn python_module_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        let mut seen = HashSet::new();
        if !self.path.is_dir() {
            return Ok(paths);
        }

        let walker = WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry.path()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().map(|e| e != "py").unwrap_or(true) {
                continue;
            }

            let parent = match path.parent() {
                Some(parent) => parent,
                None => continue,
            };
            if parent == self.path {
                let name = entry.file_name().to_string_lossy();
                if REPOSITORY_ROOT_IGNORED_FILES.contains(&name.as_ref()) {
                    continue;
                }
            }
            if seen.insert(parent.to_path_buf()) {
                paths.push(parent.to_path_buf());
            }
        }

        // Parents before nested modules
        paths.sort();
        Ok(paths)
    }

    /// Check if a module directory is a test module directory
    ///
    /// A module is a test module when any directory between the repository
    /// root and the module, or the module directory itself, is named as a
    /// configured test directory.
    pub fn is_test_module_path(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.path).unwrap_or(path);
        let parents = module_parents(relative);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        parents
            .iter()
            .any(|parent| self.configuration.is_test_directory(parent))
            || self.configuration.is_test_directory(&name)
    }

    fn discover(&self) -> Result<Discovery> {
        let mut discovery = Discovery::default();
        for path in self.python_module_paths()? {
            let group = if self.is_test_module_path(&path) {
                ModuleGroup::Tests
            } else {
                ModuleGroup::Modules
            };
            let key = relative_key(path.strip_prefix(&self.path).unwrap_or(&path));
            let module = PythonModule::attached(path, self.self_ref.clone(), group)?;
            discovery.register(module, key);
        }
        log::debug!(
            "discovered {} modules and {} test modules in {}",
            discovery.modules.len(),
            discovery.test_modules.len(),
            self.path.display()
        );
        Ok(discovery)
    }

    fn ensure_discovered(&self) -> Result<()> {
        if self.discovery.borrow().is_none() {
            let discovery = self.discover()?;
            *self.discovery.borrow_mut() = Some(discovery);
        }
        Ok(())
    }

    fn with_discovery<T>(&self, f: impl FnOnce(&Discovery) -> T) -> Result<T> {
        self.ensure_discovered()?;
        let discovery = self.discovery.borrow();
        match discovery.as_ref() {
            Some(discovery) => Ok(f(discovery)),
            None => Err(Error::other("module discovery did not run")),
        }
    }

    /// Detect python modules in the repository, replacing memoized results
    pub fn detect_python_modules(&self) -> Result<(Vec<Rc<PythonModule>>, Vec<Rc<PythonModule>>)> {
        self.reload();
        self.with_discovery(|d| (d.modules.clone(), d.test_modules.clone()))
    }

    /// Drop memoized module discovery results
    pub fn reload(&self) {
        self.discovery.borrow_mut().take();
    }

    /// Normal python modules
    pub fn python_modules(&self) -> Result<Vec<Rc<PythonModule>>> {
        self.with_discovery(|d| d.modules.clone())
    }

    /// Test python modules
    pub fn python_test_modules(&self) -> Result<Vec<Rc<PythonModule>>> {
        self.with_discovery(|d| d.test_modules.clone())
    }

    /// Files in all normal python modules
    pub fn python_files(&self) -> Result<Vec<Rc<PythonFile>>> {
        Ok(self
            .python_modules()?
            .iter()
            .flat_map(|module| module.files())
            .collect())
    }

    /// Modules by path relative to the repository root
    pub fn module_index(&self) -> Result<HashMap<String, Rc<PythonModule>>> {
        self.with_discovery(|d| d.module_index.clone())
    }

    pub(crate) fn module_by_relative_path(&self, relative: &Path) -> Result<Option<Rc<PythonModule>>> {
        let key = relative_key(relative);
        self.with_discovery(|d| d.module_index.get(&key).cloned())
    }

    /// Get python module by path relative to repository root
    ///
    /// Name can be separated with `/` or `.`. Returns None for unknown modules.
    pub fn get_python_module(&self, name: &str) -> Result<Option<Rc<PythonModule>>> {
        let separator = if name.contains('/') { '/' } else { '.' };
        let relative: PathBuf = name
            .split(separator)
            .filter(|part| !part.is_empty())
            .collect();
        self.module_by_relative_path(&relative)
    }

    /// Create a new python module to the repository
    ///
    /// Missing intermediate modules are created with index files.
    pub fn create_python_module(&self, name: &str, test_module: bool) -> Result<Rc<PythonModule>> {
        let components = get_module_path_components(name, false, false)?;
        let repository = self
            .self_ref
            .upgrade()
            .ok_or_else(|| Error::detached("Repository is not available"))?;

        let mut module = None;
        for index in 0..components.len() {
            let relative: PathBuf = components[..=index].iter().collect();
            let item = match self.module_by_relative_path(&relative)? {
                Some(existing) => existing,
                None => {
                    let path = self.path.join(&relative);
                    let group = if test_module || self.is_test_module_path(&path) {
                        ModuleGroup::Tests
                    } else {
                        ModuleGroup::Modules
                    };
                    let created = PythonModule::create_module(&path, &repository, group)?;
                    self.register_module(Rc::clone(&created), relative_key(&relative))?;
                    created
                }
            };
            module = Some(item);
        }

        module.ok_or_else(|| Error::invalid_name(format!("Empty module name: {}", name)))
    }

    /// Create new python file to specified path in the repository
    ///
    /// Creates the module path as required. Files in the repository root
    /// are not linked to a module.
    pub fn create_python_file(&self, path: &str, test_module: bool) -> Result<Rc<PythonFile>> {
        let path = path.strip_suffix(".py").unwrap_or(path);
        let mut components = get_module_path_components(path, false, false)?;
        let filename = components
            .pop()
            .ok_or_else(|| Error::invalid_name(format!("Empty file name: {}", path)))?;

        if components.is_empty() {
            let file = PythonFile::create(self.path.join(format!("{}.py", filename)))?;
            return Ok(Rc::new(file));
        }

        let module = self.create_python_module(&components.join("/"), test_module)?;
        module.create_file(&filename)
    }

    fn register_module(&self, module: Rc<PythonModule>, key: String) -> Result<()> {
        self.ensure_discovered()?;
        if let Some(discovery) = self.discovery.borrow_mut().as_mut() {
            discovery.register(module, key);
        }
        Ok(())
    }

    /// Git repository for the repository source tree
    pub fn git_repository(&self) -> Result<GitRepository> {
        GitRepository::open(&self.path)
    }

    /// Short git revision of the repository HEAD
    pub fn git_short_revision(&self) -> Result<String> {
        self.git_repository()?.get_revision(Some(GIT_REVISION_CHARACTERS))
    }

    /// Version of the main python package
    pub fn package_version(&self) -> Result<PythonPackageVersion> {
        let repository = self
            .self_ref
            .upgrade()
            .ok_or_else(|| Error::detached("Repository is not available"))?;
        PythonPackageVersion::load(&repository)
    }

    pub fn debug(&self, message: &str) -> Result<()> {
        log::debug!("{}", message);
        Ok(())
    }

    pub fn error(&self, message: &str) -> Result<()> {
        log::error!("{}", message);
        Ok(())
    }

    pub fn message(&self, message: &str) -> Result<()> {
        log::info!("{}", message);
        Ok(())
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Directory names between the repository root and a module directory
fn module_parents(relative: &Path) -> Vec<String> {
    match relative.parent() {
        Some(parent) => parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect(),
        None => Vec::new(),
    }
}

/// Module index key for a relative directory
fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}
