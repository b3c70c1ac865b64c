// Template generator capability shared by documented nodes
//
// Default methods form the abstract contract: anything a concrete node
// does not provide fails with `Error::NotImplemented`. A node that has a
// template loader but no template name is misconfigured and fails with
// `Error::DocumentGenerator` instead.

use crate::documentation::templates::{TemplateLoader, TemplateRenderer};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;

/// Short type name used in error messages
fn generator_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

/// Node that can render itself with a template and write the output
pub trait TemplateGenerator {
    /// Template name, without extension
    fn template_name(&self) -> Option<String> {
        None
    }

    /// Directory overriding the packaged templates
    fn template_directory(&self) -> Option<PathBuf> {
        None
    }

    fn template_loader(&self) -> Result<TemplateLoader> {
        Err(Error::not_implemented(format!(
            "template_loader() must be implemented for {}",
            generator_name::<Self>()
        )))
    }

    /// Value passed to the template as `item`
    fn template_context(&self) -> Result<serde_json::Value> {
        Err(Error::not_implemented(format!(
            "template_context() must be implemented for {}",
            generator_name::<Self>()
        )))
    }

    /// Output file for the rendered template under directory
    fn get_output_filename(&self, _directory: &Path) -> Result<PathBuf> {
        Err(Error::not_implemented(format!(
            "get_output_filename() must be implemented for {}",
            generator_name::<Self>()
        )))
    }

    fn debug(&self, _message: &str) -> Result<()> {
        Err(Error::not_implemented("debug()"))
    }

    fn error(&self, _message: &str) -> Result<()> {
        Err(Error::not_implemented("error()"))
    }

    fn message(&self, _message: &str) -> Result<()> {
        Err(Error::not_implemented("message()"))
    }

    /// Renderer for the node template
    fn template_renderer(&self) -> Result<TemplateRenderer> {
        let loader = self.template_loader()?;
        let name = self.template_name().ok_or_else(|| {
            Error::document_generator(format!(
                "{} does not define template_name",
                generator_name::<Self>()
            ))
        })?;
        Ok(TemplateRenderer::new(loader, &name, self.template_directory()))
    }

    /// Render the node template
    fn render_template(&self) -> Result<String> {
        let renderer = self.template_renderer()?;
        let item = self.template_context()?;
        let context = Context::from_value(serde_json::json!({ "item": item }))?;
        renderer.render(&context)
    }

    /// Render the template and write it to the output file
    ///
    /// Missing parent directories are created. Returns the written path.
    fn write_output(&self, directory: &Path) -> Result<PathBuf> {
        let path = self.get_output_filename(directory)?;
        let rendered = self.render_template()?;

        if let Some(parent) = path.parent() {
            if !parent.is_dir() {
                self.debug(&format!("create directory {}", parent.display()))?;
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, format!("{}\n", rendered))?;
        Ok(path)
    }

    /// Generate documentation for the node
    fn generate(&self, directory: &Path) -> Result<PathBuf> {
        self.write_output(directory)
    }
}
