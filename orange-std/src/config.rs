//! Folder-based configuration.
//!
//! Every `*.json` file of a folder becomes one section, named after the
//! lowercased file stem: `routes.json` is the `routes` section.

use orange_core::ConfigError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Configuration sections, keyed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    sections: Map<String, Value>,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file of `folder`.
    ///
    /// Files are read in file name order. Each must hold a JSON object or
    /// array.
    pub fn load(folder: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(ConfigError::ConfigFolderNotFound(folder.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(folder)
            .map_err(io_error(folder))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        let mut config = Self::new();
        for path in files {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let name = name.to_owned();

            let text = fs::read_to_string(&path).map_err(io_error(&path))?;
            let value: Value = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: Box::new(e),
            })?;

            if !(value.is_object() || value.is_array()) {
                return Err(ConfigError::ConfigFileNotArray(path));
            }

            tracing::debug!(section = %name, path = %path.display(), "config section loaded");
            config.set(&name, value);
        }

        Ok(config)
    }

    /// Get a section.
    pub fn get(&self, name: &str) -> Result<&Value, ConfigError> {
        self.sections
            .get(&name.to_lowercase())
            .ok_or_else(|| ConfigError::ConfigNotFound(name.to_owned()))
    }

    /// Deserialize a section.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self.get(name)?.clone();
        serde_json::from_value(value).map_err(|e| ConfigError::Invalid {
            name: name.to_owned(),
            source: Box::new(e),
        })
    }

    /// Check if a section exists.
    pub fn has(&self, name: &str) -> bool {
        self.sections.contains_key(&name.to_lowercase())
    }

    /// Set a section (chainable).
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.sections.insert(name.to_lowercase(), value.into());
        self
    }

    /// Remove a section.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.sections.remove(&name.to_lowercase())
    }

    /// Section names.
    pub fn names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Merge overrides into the configuration.
    ///
    /// Objects are merged key by key, recursively; any other value replaces
    /// what was there. Top-level keys name sections.
    pub fn merge(&mut self, overrides: Map<String, Value>) -> &mut Self {
        for (name, value) in overrides {
            match self.sections.get_mut(&name.to_lowercase()) {
                Some(existing) => merge_value(existing, value),
                None => {
                    self.sections.insert(name.to_lowercase(), value);
                }
            }
        }
        self
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { path, source }
}

fn merge_value(target: &mut Value, value: Value) {
    match (target, value) {
        (Value::Object(target), Value::Object(value)) => {
            for (key, value) in value {
                match target.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, value) => *target = value,
    }
}
