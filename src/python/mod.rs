// Python repository object graph
//
// Repository -> modules -> files. Modules hold weak links to their
// repository and files hold weak links to their module.

pub mod file;
pub mod module;
pub mod names;
pub mod repository;
pub mod version;

pub use file::PythonFile;
pub use module::{ModuleGroup, ModuleParent, PythonModule};
pub use repository::{Repository, RepositoryOptions};
pub use version::{PythonPackageVersion, Version, VersionSource};
