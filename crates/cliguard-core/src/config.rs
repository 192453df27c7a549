// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Analyzer configuration options.
//!
//! **DDD Context:** Configuration
//!
//! The host exposes configuration to analyzers as a flat key/value store
//! ([`AnalyzerConfigOptions`]). [`GlobalOptions`] is the concrete store. It
//! can be loaded from a `cliguard.toml` file, whose tables flatten to dotted
//! keys:
//!
//! ```toml
//! [build_property]
//! enableaotanalyzer = true
//!
//! [dotnet_diagnostic.S1052]
//! severity = "warning"
//! ```
//!
//! becomes `build_property.enableaotanalyzer = "true"` and
//! `dotnet_diagnostic.S1052.severity = "warning"`.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use std::collections::BTreeMap;
use std::fs;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Name of the configuration file looked up by [`discover_config_file`].
pub const CONFIG_FILE_NAME: &str = "cliguard.toml";

/// Key of the ahead-of-time analysis switch.
pub const AOT_ANALYZER_KEY: &str = "build_property.enableaotanalyzer";

/// Read-only access to configuration, as seen by analyzers.
pub trait AnalyzerConfigOptions {
    /// Returns the value for `key`, if set.
    fn get(&self, key: &str) -> Option<&str>;
}

/// Returns `true` if the ahead-of-time switch is set to exactly `"true"`.
#[must_use]
pub fn aot_analysis_enabled(options: &dyn AnalyzerConfigOptions) -> bool {
    options.get(AOT_ANALYZER_KEY) == Some("true")
}

/// Configuration key of the severity override for a diagnostic id.
#[must_use]
pub fn severity_key(id: &str) -> String {
    format!("dotnet_diagnostic.{id}.severity")
}

/// A configured severity for a diagnostic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityOverride {
    /// Report as an error.
    Error,
    /// Report as a warning.
    Warning,
    /// Do not report.
    None,
}

impl FromStr for SeverityOverride {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// Errors loading configuration.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration file '{path}'")]
    #[diagnostic(code(cliguard::config::read))]
    Read {
        /// The file that was being read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML.
    #[error("failed to parse configuration file '{path}'")]
    #[diagnostic(code(cliguard::config::parse))]
    Parse {
        /// The file that was being parsed.
        path: Utf8PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is not allowed for its key.
    #[error("invalid value '{value}' for '{key}'")]
    #[diagnostic(
        code(cliguard::config::invalid_value),
        help("severity overrides accept \"error\", \"warning\" or \"none\"")
    )]
    InvalidValue {
        /// The offending key.
        key: String,
        /// The offending value.
        value: String,
    },

    /// A value has a shape that cannot be flattened to text.
    #[error("unsupported value for '{key}': arrays and dates cannot be used as options")]
    #[diagnostic(code(cliguard::config::unsupported_value))]
    UnsupportedValue {
        /// The offending key.
        key: String,
    },
}

/// The raw shape of a configuration file: nested tables of scalars.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct ConfigFile {
    entries: toml::Table,
}

/// An ordered key/value configuration store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    values: BTreeMap<String, String>,
}

impl GlobalOptions {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`GlobalOptions::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Copies every entry of `other` over this store.
    pub fn extend(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no entries are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, and
    /// [`ConfigError::InvalidValue`] or [`ConfigError::UnsupportedValue`] for
    /// values that fail validation.
    pub fn from_toml_str(text: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        let mut options = Self::new();
        flatten_table(&file.entries, "", &mut options)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`GlobalOptions::from_toml_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let options = Self::from_toml_str(&text, path)?;
        tracing::debug!(%path, entries = options.len(), "loaded configuration");
        Ok(options)
    }

    /// Checks that every severity override names a known severity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first bad override.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in &self.values {
            let is_severity = key.starts_with("dotnet_diagnostic.") && key.ends_with(".severity");
            if is_severity && value.parse::<SeverityOverride>().is_err() {
                return Err(ConfigError::InvalidValue {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

impl AnalyzerConfigOptions for GlobalOptions {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GlobalOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn flatten_table(table: &toml::Table, prefix: &str, out: &mut GlobalOptions) -> Result<(), ConfigError> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_table(inner, &full_key, out)?,
            toml::Value::String(text) => {
                out.set(full_key, text.clone());
            }
            toml::Value::Boolean(flag) => {
                out.set(full_key, flag.to_string());
            }
            toml::Value::Integer(number) => {
                out.set(full_key, number.to_string());
            }
            toml::Value::Float(number) => {
                out.set(full_key, number.to_string());
            }
            toml::Value::Array(_) | toml::Value::Datetime(_) => {
                return Err(ConfigError::UnsupportedValue { key: full_key });
            }
        }
    }
    Ok(())
}

/// Walks up from `start` looking for [`CONFIG_FILE_NAME`].
///
/// `start` may be a file or a directory. Returns the first file found, or
/// `None` if no ancestor contains one.
#[must_use]
pub fn discover_config_file(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start.to_path_buf()
    };
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
