// Integration tests for pydoctree

use pydoctree::python::{ModuleGroup, ModuleParent, VersionSource};
use pydoctree::{
    get_processor, Config, Error, PythonModule, Repository, RepositoryOptions, TemplateGenerator,
};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

// Repository with pkg/__init__.py, pkg/mod.py and tests/test_mod.py
fn create_basic_repository() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "setup.py", "from setuptools import setup\n");
    write(dir.path(), "pkg/__init__.py", "");
    write(dir.path(), "pkg/mod.py", "def run():\n    pass\n");
    write(dir.path(), "tests/test_mod.py", "def test_run():\n    pass\n");
    dir
}

fn open(path: &Path) -> Rc<Repository> {
    Repository::open(path, RepositoryOptions::default()).expect("Failed to open repository")
}

fn relative_names(modules: &[Rc<PythonModule>]) -> Vec<String> {
    modules
        .iter()
        .map(|module| module.relative_directory().unwrap().display().to_string())
        .collect()
}

// ============================================================================
// Discovery Tests
// ============================================================================

#[test]
fn test_discover_modules_and_test_modules() {
    let dir = create_basic_repository();
    let repository = open(dir.path());

    let modules = repository.python_modules().unwrap();
    let test_modules = repository.python_test_modules().unwrap();
    assert_eq!(relative_names(&modules), vec!["pkg"]);
    assert_eq!(relative_names(&test_modules), vec!["tests"]);
    assert_eq!(modules[0].group(), ModuleGroup::Modules);
    assert_eq!(test_modules[0].group(), ModuleGroup::Tests);

    let pkg = &modules[0];
    assert_eq!(pkg.index().unwrap().import_path().unwrap(), "pkg");
    let import_paths: Vec<String> = pkg
        .files()
        .iter()
        .map(|file| file.import_path().unwrap())
        .collect();
    assert_eq!(import_paths, vec!["pkg", "pkg.mod"]);
}

#[test]
fn test_modules_without_index_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/one.py", "");
    write(dir.path(), "a/b/c/three.py", "");
    let repository = open(dir.path());

    let modules = repository.python_modules().unwrap();
    assert_eq!(relative_names(&modules), vec!["a", "a/b/c"]);
    assert!(repository.get_python_module("a/b").unwrap().is_none());
    assert!(modules.iter().all(|module| module.index().is_none()));
}

#[test]
fn test_nested_test_directories() {
    let dir = create_basic_repository();
    write(dir.path(), "tests/unit/deep/test_deep.py", "");
    write(dir.path(), "pkg/tests/test_inner.py", "");
    let repository = open(dir.path());

    assert_eq!(relative_names(&repository.python_modules().unwrap()), vec!["pkg"]);
    assert_eq!(
        relative_names(&repository.python_test_modules().unwrap()),
        vec!["pkg/tests", "tests", "tests/unit/deep"]
    );
}

#[test]
fn test_repository_root_files() {
    let dir = create_basic_repository();
    write(dir.path(), "manage.py", "");
    write(dir.path(), "pkg/sub/helper.py", "");
    let repository = open(dir.path());

    let modules = repository.python_modules().unwrap();
    let test_modules = repository.python_test_modules().unwrap();
    assert_eq!(relative_names(&modules), vec!["", "pkg", "pkg/sub"]);
    assert_eq!(relative_names(&test_modules), vec!["tests"]);
    assert_eq!(modules.len() + test_modules.len(), 4);

    let root = &modules[0];
    assert!(root.is_repository_root());
    assert!(!modules[1].is_repository_root());
    let names: Vec<String> = root.files().iter().map(|file| file.name()).collect();
    assert_eq!(names, vec!["manage"]);
}

#[test]
fn test_repository_root_named_like_test_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tests");
    write(&root, "conftest.py", "");
    write(&root, "pkg/__init__.py", "");
    let repository = open(&root);

    let modules = repository.python_modules().unwrap();
    let test_modules = repository.python_test_modules().unwrap();
    assert_eq!(relative_names(&modules), vec!["pkg"]);
    assert_eq!(relative_names(&test_modules), vec![""]);
    assert!(test_modules[0].is_repository_root());
    assert_eq!(test_modules[0].group(), ModuleGroup::Tests);
}

#[test]
fn test_configured_test_directories() {
    let dir = create_basic_repository();
    write(dir.path(), "unittests/test_other.py", "");
    write(
        dir.path(),
        ".pydoctree.toml",
        "test_directories = [\"tests\", \"unittests\"]\n",
    );
    let repository = open(dir.path());
    assert_eq!(
        relative_names(&repository.python_test_modules().unwrap()),
        vec!["tests", "unittests"]
    );
}

#[test]
fn test_explicit_configuration() {
    let dir = create_basic_repository();
    let mut config = Config::default();
    config.test_directories.clear();
    let repository = Repository::open(
        dir.path(),
        RepositoryOptions::default().with_configuration(config),
    )
    .unwrap();
    assert_eq!(
        relative_names(&repository.python_modules().unwrap()),
        vec!["pkg", "tests"]
    );
    assert!(repository.python_test_modules().unwrap().is_empty());
}

#[test]
fn test_missing_module_lookup_returns_none() {
    let dir = create_basic_repository();
    let repository = open(dir.path());
    assert!(repository.get_python_module("missing/path").unwrap().is_none());
    assert!(repository.get_python_module("missing.path").unwrap().is_none());
    assert!(repository.get_python_module("pkg").unwrap().is_some());
}

#[test]
fn test_module_directory_is_not_repository() {
    let dir = create_basic_repository();
    let result = Repository::open(dir.path().join("pkg"), RepositoryOptions::default());
    match result {
        Err(Error::RepositoryIsModule(path)) => assert!(path.ends_with("pkg")),
        other => panic!("Expected RepositoryIsModule, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_module_index_identity() {
    let dir = create_basic_repository();
    write(dir.path(), "pkg/sub/inner.py", "");
    let repository = open(dir.path());

    let index = repository.module_index().unwrap();
    let modules = repository.python_modules().unwrap();
    let test_modules = repository.python_test_modules().unwrap();
    assert_eq!(index.len(), modules.len() + test_modules.len());

    for module in modules.iter().chain(test_modules.iter()) {
        let key = module.relative_directory().unwrap().display().to_string();
        assert!(Rc::ptr_eq(&index[&key], module));
        for file in module.files() {
            assert!(Rc::ptr_eq(&file.module().unwrap(), module));
        }
    }
}

#[test]
fn test_discovery_is_repeatable() {
    let dir = create_basic_repository();
    write(dir.path(), "pkg/sub/inner.py", "");
    let repository = open(dir.path());

    let (first, first_tests) = repository.detect_python_modules().unwrap();
    let (second, second_tests) = repository.detect_python_modules().unwrap();
    assert_eq!(relative_names(&first), relative_names(&second));
    assert_eq!(relative_names(&first_tests), relative_names(&second_tests));
}

#[test]
fn test_module_parent() {
    let dir = create_basic_repository();
    write(dir.path(), "pkg/sub/inner.py", "");
    let repository = open(dir.path());

    let pkg = repository.get_python_module("pkg").unwrap().unwrap();
    let sub = repository.get_python_module("pkg.sub").unwrap().unwrap();

    match sub.parent().unwrap() {
        Some(ModuleParent::Module(parent)) => assert!(Rc::ptr_eq(&parent, &pkg)),
        other => panic!("Expected module parent, got {:?}", other.is_some()),
    }
    let parent = pkg.parent().unwrap().unwrap();
    assert!(parent.is_repository());
    assert!(pkg.index().unwrap().is_module_index().unwrap());
    assert!(!sub.files()[0].is_module_index().unwrap());
}

#[test]
fn test_excluded_patterns() {
    let dir = create_basic_repository();
    write(dir.path(), "pkg/__pycache__/mod.cpython.py", "");
    write(dir.path(), "build/lib/pkg/mod.py", "");
    write(dir.path(), "vendor/thirdparty/lib.py", "");

    let repository = Repository::open(
        dir.path(),
        RepositoryOptions::default().with_excluded(["vendor/"]),
    )
    .unwrap();
    assert_eq!(relative_names(&repository.python_modules().unwrap()), vec!["pkg"]);
}

// ============================================================================
// Creation Tests
// ============================================================================

#[test]
fn test_create_python_module() {
    let dir = create_basic_repository();
    let repository = open(dir.path());

    let module = repository.create_python_module("alpha/beta", false).unwrap();
    assert!(dir.path().join("alpha/__init__.py").is_file());
    assert!(dir.path().join("alpha/beta/__init__.py").is_file());
    assert_eq!(module.import_path().unwrap(), "alpha.beta");

    let found = repository.get_python_module("alpha.beta").unwrap().unwrap();
    assert!(Rc::ptr_eq(&found, &module));
    let alpha = repository.get_python_module("alpha").unwrap().unwrap();
    match module.parent().unwrap() {
        Some(ModuleParent::Module(parent)) => assert!(Rc::ptr_eq(&parent, &alpha)),
        _ => panic!("Expected alpha as parent"),
    }

    assert_eq!(
        relative_names(&repository.python_modules().unwrap()),
        vec!["pkg", "alpha", "alpha/beta"]
    );
    repository.reload();
    assert_eq!(
        relative_names(&repository.python_modules().unwrap()),
        vec!["alpha", "alpha/beta", "pkg"]
    );
}

#[test]
fn test_create_existing_module_returns_same_module() {
    let dir = create_basic_repository();
    let repository = open(dir.path());
    let pkg = repository.get_python_module("pkg").unwrap().unwrap();
    let created = repository.create_python_module("pkg", false).unwrap();
    assert!(Rc::ptr_eq(&pkg, &created));
}

#[test]
fn test_create_test_module() {
    let dir = create_basic_repository();
    let repository = open(dir.path());
    let module = repository.create_python_module("tests/integration", true).unwrap();
    assert_eq!(module.group(), ModuleGroup::Tests);
    assert!(repository
        .python_test_modules()
        .unwrap()
        .iter()
        .any(|item| Rc::ptr_eq(item, &module)));
}

#[test]
fn test_create_python_module_invalid_names() {
    let dir = create_basic_repository();
    let repository = open(dir.path());
    assert!(matches!(
        repository.create_python_module("not-valid", false),
        Err(Error::InvalidName(_))
    ));
    assert!(matches!(
        repository.create_python_module("pkg/class", false),
        Err(Error::InvalidName(_))
    ));
    assert!(matches!(
        repository.create_python_module("a/b.c", false),
        Err(Error::InvalidName(_))
    ));
    assert!(!dir.path().join("a").exists());
}

#[test]
fn test_create_python_file() {
    let dir = create_basic_repository();
    let repository = open(dir.path());

    let file = repository.create_python_file("pkg/helpers", false).unwrap();
    assert!(dir.path().join("pkg/helpers.py").is_file());
    assert_eq!(file.import_path().unwrap(), "pkg.helpers");

    let pkg = repository.get_python_module("pkg").unwrap().unwrap();
    assert!(pkg.files().iter().any(|item| Rc::ptr_eq(item, &file)));

    let nested = repository.create_python_file("newpkg/sub/tool.py", false).unwrap();
    assert_eq!(nested.import_path().unwrap(), "newpkg.sub.tool");
    assert!(dir.path().join("newpkg/__init__.py").is_file());

    let toplevel = repository.create_python_file("manage", false).unwrap();
    assert!(dir.path().join("manage.py").is_file());
    assert!(toplevel.module().is_none());
}

// ============================================================================
// Documentation Tests
// ============================================================================

#[test]
fn test_generate_sphinx_documentation() {
    let dir = create_basic_repository();
    write(dir.path(), "pkg/plain/helper.py", "");
    let output = TempDir::new().unwrap();

    let repository = get_processor("sphinx", dir.path(), &[]).unwrap();
    let index = repository.generate_documentation(Some(output.path())).unwrap();
    assert_eq!(index, output.path().join("index.rst"));

    let root_index = fs::read_to_string(&index).unwrap();
    assert!(root_index.contains(".. toctree::"));
    assert!(root_index.contains("   :maxdepth: 2"));
    assert!(root_index.contains("   pkg/index"));
    assert!(root_index.contains("   pkg/plain/index"));
    assert!(root_index.ends_with('\n'));
    assert!(!root_index.ends_with("\n\n"));

    let pkg_index = fs::read_to_string(output.path().join("pkg/index.rst")).unwrap();
    assert!(pkg_index.starts_with("pkg\n===\n"));
    assert!(pkg_index.contains(".. automodule:: pkg\n"));
    assert!(pkg_index.contains("    :members:"));
    assert!(pkg_index.contains("    :undoc-members:"));
    assert!(pkg_index.contains("   mod"));

    let module = fs::read_to_string(output.path().join("pkg/mod.rst")).unwrap();
    assert!(module.contains(".. automodule:: pkg.mod"));
    assert!(!module.contains(".. toctree::"));

    let plain_index = fs::read_to_string(output.path().join("pkg/plain/index.rst")).unwrap();
    assert!(plain_index.contains(":caption: pkg/plain"));
    assert!(plain_index.contains("   helper"));
    assert!(output.path().join("pkg/plain/helper.rst").is_file());

    assert!(!output.path().join("tests").exists());
}

#[test]
fn test_generate_with_repository_root_files() {
    let dir = create_basic_repository();
    write(dir.path(), "manage.py", "");
    let output = TempDir::new().unwrap();

    let repository = get_processor("sphinx", dir.path(), &[]).unwrap();
    let root = repository.get_python_module("").unwrap().unwrap();
    assert!(root.is_repository_root());
    assert_eq!(
        root.generate_module_docs(output.path()).unwrap(),
        vec![output.path().join("manage.rst")]
    );

    let index = repository.generate_documentation(Some(output.path())).unwrap();
    let root_index = fs::read_to_string(&index).unwrap();
    let entries: Vec<&str> = root_index
        .lines()
        .skip_while(|line| !line.contains(":maxdepth:"))
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    assert_eq!(entries, vec!["manage", "pkg/index"]);
    assert!(!root_index.contains(".. automodule::"));

    let manage = fs::read_to_string(output.path().join("manage.rst")).unwrap();
    assert!(manage.contains(".. automodule:: manage"));
}

#[test]
fn test_module_with_index_writes_single_index() {
    let dir = create_basic_repository();
    let output = TempDir::new().unwrap();
    let repository = get_processor("sphinx", dir.path(), &[]).unwrap();
    let pkg = repository.get_python_module("pkg").unwrap().unwrap();

    let paths = pkg.generate_module_docs(output.path()).unwrap();
    let indexes: Vec<_> = paths.iter().filter(|path| path.ends_with("index.rst")).collect();
    assert_eq!(indexes.len(), 1);
    assert_eq!(paths.len(), pkg.files().len());
}

#[test]
fn test_generate_default_output_directory() {
    let dir = create_basic_repository();
    let repository = get_processor("sphinx", dir.path(), &[]).unwrap();
    let index = repository.generate_documentation(None).unwrap();
    assert_eq!(index, repository.path().join("docs/code/index.rst"));

    // Generated docs are excluded from discovery
    repository.reload();
    assert_eq!(relative_names(&repository.python_modules().unwrap()), vec!["pkg"]);
}

#[test]
fn test_custom_template_directory() {
    let dir = create_basic_repository();
    write(
        dir.path(),
        "doc-templates/automodule.rst.tera",
        "custom {{ item.import_path }}",
    );
    write(dir.path(), "doc-templates/module_index.rst.tera", "module {{ item.caption }}");
    write(
        dir.path(),
        "doc-templates/repository_index.rst.tera",
        "repository {{ item.name }}",
    );
    write(
        dir.path(),
        ".pydoctree.toml",
        "[sphinx]\ntemplate_directory = \"doc-templates\"\n",
    );
    let output = TempDir::new().unwrap();

    let repository = get_processor("sphinx", dir.path(), &[]).unwrap();
    repository.generate(output.path()).unwrap();
    assert_eq!(
        fs::read_to_string(output.path().join("pkg/mod.rst")).unwrap(),
        "custom pkg.mod\n"
    );
}

#[test]
fn test_missing_custom_template() {
    let dir = create_basic_repository();
    write(
        dir.path(),
        ".pydoctree.toml",
        "[sphinx]\ntemplate_directory = \"doc-templates\"\n",
    );
    let output = TempDir::new().unwrap();
    let repository = get_processor("sphinx", dir.path(), &[]).unwrap();
    assert!(matches!(
        repository.generate(output.path()),
        Err(Error::TemplateNotFound(_))
    ));
}

// ============================================================================
// Version Tests
// ============================================================================

fn create_package_repository(init: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("sample-project");
    write(&root, "sample_project/__init__.py", init);
    (dir, root)
}

#[test]
fn test_version_from_module_index() {
    let (_dir, root) = create_package_repository("\"\"\"Sample\"\"\"\n__version__ = '1.2.3'\n");
    let repository = open(&root);
    let version = repository.package_version().unwrap();
    assert_eq!(version.to_string(), "1.2.3");
    assert_eq!(version.source(), VersionSource::ModuleIndex);
}

#[test]
fn test_version_from_pyproject() {
    let (_dir, root) = create_package_repository("__version__ = '1.2.3'\n");
    write(
        &root,
        "pyproject.toml",
        "[tool.poetry]\nname = \"sample-project\"\nversion = \"2.0.1\"\n",
    );
    let repository = open(&root);
    let version = repository.package_version().unwrap();
    assert_eq!(version.to_string(), "2.0.1");
    assert_eq!(version.source(), VersionSource::Pyproject);
}

#[test]
fn test_version_default() {
    let (_dir, root) = create_package_repository("");
    let repository = open(&root);
    let version = repository.package_version().unwrap();
    assert_eq!(version.to_string(), "0.0");
    assert!(version.is_dummy());
}

#[test]
fn test_update_module_version() {
    let (_dir, root) =
        create_package_repository("\"\"\"Sample\"\"\"\n__version__ = '1.0'\nNAME = 'x'  \n");
    let repository = open(&root);
    let mut version = repository.package_version().unwrap();

    version.update_module_version("1.1").unwrap();
    let contents = fs::read_to_string(root.join("sample_project/__init__.py")).unwrap();
    assert_eq!(contents, "\"\"\"Sample\"\"\"\n__version__ = '1.1'\nNAME = 'x'\n");
    assert_eq!(repository.package_version().unwrap().to_string(), "1.1");
}

#[test]
fn test_update_module_version_regression() {
    let (_dir, root) = create_package_repository("__version__ = '1.0'\n");
    let repository = open(&root);
    let mut version = repository.package_version().unwrap();

    assert!(matches!(
        version.update_module_version("1.0.0"),
        Err(Error::VersionRegression { .. })
    ));
    assert!(matches!(
        version.update_module_version("0.9"),
        Err(Error::VersionRegression { .. })
    ));
    assert!(matches!(
        version.update_module_version("1.1rc1"),
        Ok(())
    ));
}

#[test]
fn test_update_dummy_version_appends_line() {
    let (_dir, root) = create_package_repository("import os\n");
    let repository = open(&root);
    let mut version = repository.package_version().unwrap();
    version.update_module_version("0.1").unwrap();

    let contents = fs::read_to_string(root.join("sample_project/__init__.py")).unwrap();
    assert_eq!(contents, "import os\n__version__ = '0.1'\n");
}

#[test]
fn test_update_version_without_main_module() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("sample-project");
    write(&root, "other/__init__.py", "");
    let repository = open(&root);
    let mut version = repository.package_version().unwrap();
    assert!(version.update_module_version("1.0").is_err());
}

// ============================================================================
// Git Tests
// ============================================================================

#[test]
fn test_git_repository_missing() {
    let dir = create_basic_repository();
    let repository = open(dir.path());
    if pydoctree::git::detect_git_repository_path(repository.path()).is_none() {
        assert!(matches!(repository.git_repository(), Err(Error::Git(_))));
        assert!(repository.git_short_revision().is_err());
    }
}
