// Template rendering for generated documents
//
// Templates are either packaged with the binary or read from a configured
// template directory. Rendered text always has trailing whitespace removed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tera::{Context, Tera, Value};

/// Packaged sphinx templates
const SPHINX_TEMPLATES: &[(&str, &str)] = &[
    (
        "repository_index.rst.tera",
        include_str!("../../templates/sphinx/repository_index.rst.tera"),
    ),
    (
        "module_index.rst.tera",
        include_str!("../../templates/sphinx/module_index.rst.tera"),
    ),
    (
        "automodule.rst.tera",
        include_str!("../../templates/sphinx/automodule.rst.tera"),
    ),
];

/// Template loader kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateLoader {
    /// Generic loader without packaged templates
    Generic,
    /// Sphinx reStructuredText templates
    Sphinx,
}

impl TemplateLoader {
    pub fn name(&self) -> &'static str {
        match self {
            TemplateLoader::Generic => "generic",
            TemplateLoader::Sphinx => "sphinx",
        }
    }

    /// Extension added to template names without one
    pub fn auto_extension(&self) -> &'static str {
        match self {
            TemplateLoader::Generic => ".tera",
            TemplateLoader::Sphinx => ".rst.tera",
        }
    }

    /// Templates packaged for this loader
    pub fn builtin_templates(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            TemplateLoader::Generic => &[],
            TemplateLoader::Sphinx => SPHINX_TEMPLATES,
        }
    }

    fn builtin_template(&self, name: &str) -> Option<&'static str> {
        self.builtin_templates()
            .iter()
            .find(|(template, _)| *template == name)
            .map(|(_, source)| *source)
    }
}

impl fmt::Display for TemplateLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renderer for one named template
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    loader: TemplateLoader,
    name: String,
    template_directory: Option<PathBuf>,
}

impl TemplateRenderer {
    /// Create renderer for template name
    ///
    /// If the name has no extension the loader extension is added.
    pub fn new(loader: TemplateLoader, name: &str, template_directory: Option<PathBuf>) -> Self {
        let has_extension = Path::new(name).extension().is_some();
        let name = if has_extension {
            name.to_string()
        } else {
            format!("{}{}", name, loader.auto_extension())
        };
        Self {
            loader,
            name,
            template_directory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loader(&self) -> TemplateLoader {
        self.loader
    }

    pub fn template_directory(&self) -> Option<&Path> {
        self.template_directory.as_deref()
    }

    fn not_found(&self) -> Error {
        Error::TemplateNotFound(format!("{} template {}", self.loader, self.name))
    }

    /// Build a tera instance holding the template
    pub fn engine(&self) -> Result<Tera> {
        let mut tera = Tera::default();
        match &self.template_directory {
            Some(directory) => {
                let path = directory.join(&self.name);
                if !path.is_file() {
                    return Err(self.not_found());
                }
                tera.add_template_file(&path, Some(self.name.as_str()))?;
            }
            None => {
                let source = self
                    .loader
                    .builtin_template(&self.name)
                    .ok_or_else(|| self.not_found())?;
                tera.add_raw_template(&self.name, source)?;
            }
        }
        tera.register_filter("heading", heading);
        Ok(tera)
    }

    /// Render the template with context
    pub fn render(&self, context: &Context) -> Result<String> {
        let rendered = self.engine()?.render(&self.name, context)?;
        Ok(rendered.trim_end().to_string())
    }
}

/// Render a reStructuredText title with an underline of equal length
fn heading(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let title = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let marker = args
        .get("char")
        .and_then(|v| v.as_str())
        .and_then(|s| s.chars().next())
        .unwrap_or('=');
    let underline: String = std::iter::repeat(marker).take(title.chars().count()).collect();
    Ok(Value::String(format!("{}\n{}", title, underline)))
}
