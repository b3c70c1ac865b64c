use crate::error::{Error, Result};
use serde::Serialize;

/// One setting from `git config --show-scope --list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitConfigSetting {
    pub scope: String,
    pub key: String,
    pub value: String,
}

impl GitConfigSetting {
    /// Section name of the key, for example `user` for `user.name`
    pub fn section(&self) -> &str {
        self.key.split('.').next().unwrap_or(&self.key)
    }
}

/// Git configuration settings in load order
#[derive(Debug, Clone, Default, Serialize)]
pub struct GitConfig {
    settings: Vec<GitConfigSetting>,
}

impl GitConfig {
    /// Parse `scope<TAB>key=value` lines
    pub fn parse(lines: &[String]) -> Result<Self> {
        let settings = lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (scope, setting) = line
                    .split_once('\t')
                    .ok_or_else(|| Error::git(format!("Unexpected git config line {}", line)))?;
                // Boolean settings may be listed without a value
                let (key, value) = setting.split_once('=').unwrap_or((setting, ""));
                Ok(GitConfigSetting {
                    scope: scope.to_string(),
                    key: key.to_lowercase(),
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &[GitConfigSetting] {
        &self.settings
    }

    /// Effective value of a key; later scopes override earlier ones
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.settings
            .iter()
            .rev()
            .find(|setting| setting.key == key)
            .map(|setting| setting.value.as_str())
    }

    /// Settings in a section
    pub fn section(&self, name: &str) -> Vec<&GitConfigSetting> {
        let name = name.to_lowercase();
        self.settings
            .iter()
            .filter(|setting| setting.section() == name)
            .collect()
    }
}
