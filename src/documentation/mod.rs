// Documentation generation for python repositories

pub mod generator;
pub mod nodes;
pub mod sphinx;
pub mod templates;

pub use generator::TemplateGenerator;
pub use sphinx::{FileContext, ModuleContext, RepositoryContext};
pub use templates::{TemplateLoader, TemplateRenderer};

use crate::error::{Error, Result};
use crate::python::{Repository, RepositoryOptions};
use std::path::Path;
use std::rc::Rc;

/// Output types accepted by `get_processor`
pub const OUTPUT_TYPES: &[&str] = &["sphinx"];

/// Open a repository bound to the template loader for an output type
pub fn get_processor(output_type: &str, path: &Path, excluded: &[String]) -> Result<Rc<Repository>> {
    let loader = match output_type {
        "sphinx" => TemplateLoader::Sphinx,
        _ => {
            return Err(Error::document_generator(format!(
                "Invalid output type {}",
                output_type
            )))
        }
    };
    let options = RepositoryOptions::default()
        .with_excluded(excluded.iter().cloned())
        .with_template_loader(loader);
    Repository::open(path, options)
}
