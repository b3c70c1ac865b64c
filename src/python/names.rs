// Python identifier and module path helpers

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Index filename of a python module directory
pub const INDEX_FILENAME: &str = "__init__.py";

/// Python reserved keywords
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Check if value is a valid python identifier
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Check if value is a python reserved keyword
pub fn is_keyword(value: &str) -> bool {
    KEYWORDS.contains(&value)
}

/// Check if directory is a python module directory: an existing directory
/// with an identifier name and an `__init__.py` file
pub fn is_python_module_directory(directory: &Path) -> bool {
    if !directory.is_dir() {
        return false;
    }

    let name = match directory.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    if !is_identifier(name) {
        return false;
    }

    directory.join(INDEX_FILENAME).is_file()
}

/// Validate a string to be used as python package or module name
pub fn validate_module_name(value: &str, convert_lowercase: bool, allow_keywords: bool) -> Result<String> {
    if !is_identifier(value) {
        return Err(Error::invalid_name(format!(
            "Name is not valid python identifier: {}",
            value
        )));
    }

    if !allow_keywords && is_keyword(value) {
        return Err(Error::invalid_name(format!("Name is a python keyword: {}", value)));
    }

    let lowercase = value.to_lowercase();
    if convert_lowercase {
        return Ok(lowercase);
    }
    if lowercase != value {
        return Err(Error::invalid_name(format!(
            "Name is not a lowercase string: {}",
            value
        )));
    }

    Ok(value.to_string())
}

/// Validate and return module path components
///
/// Path can be separated with `.` or `/`, but not both.
pub fn get_module_path_components(
    value: &str,
    convert_lowercase: bool,
    allow_keywords: bool,
) -> Result<Vec<String>> {
    let separator = match (value.contains('/'), value.contains('.')) {
        (true, true) => {
            return Err(Error::invalid_name(format!(
                "Path contains both . and /: {}",
                value
            )))
        }
        (true, false) => Some('/'),
        (false, true) => Some('.'),
        (false, false) => None,
    };

    match separator {
        Some(separator) => value
            .split(separator)
            .map(|name| validate_module_name(name, convert_lowercase, allow_keywords))
            .collect(),
        None => Ok(vec![validate_module_name(value, convert_lowercase, allow_keywords)?]),
    }
}

/// Convert a repository directory name to a python module name
///
/// `MyRepository` becomes `my_repository` and `my-repo` becomes `my_repo`.
pub fn underscore(value: &str) -> String {
    static ACRONYM: OnceLock<Regex> = OnceLock::new();
    static CAMEL: OnceLock<Regex> = OnceLock::new();
    let acronym = ACRONYM.get_or_init(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
    let camel = CAMEL.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

    let value = acronym.replace_all(value, "${1}_${2}");
    let value = camel.replace_all(&value, "${1}_${2}");
    value.replace('-', "_").to_lowercase()
}
