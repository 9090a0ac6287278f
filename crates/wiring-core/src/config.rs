// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scan configuration, read from a TOML manifest.

use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What to do when discovery yields the same component twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the first descriptor and log a warning for the others.
    #[default]
    KeepFirst,
    /// Fail the scan with `DuplicateComponent`.
    Reject,
}

/// Represents the structure of a `Wiring.toml` manifest.
///
/// ```toml
/// scope = "my_app::services"
/// duplicates = "reject"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Module-path prefix to scan. Empty means every module.
    pub scope: String,
    /// Handling of duplicate registrations.
    pub duplicates: DuplicatePolicy,
}

/// Failure to load a [`ScanConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The manifest exists but could not be read.
    #[error("failed to read `{}`", .path.display())]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The manifest is not valid TOML or has unexpected keys.
    #[error("invalid scan configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ScanConfig {
    /// The file name [`load`](ScanConfig::load) is usually pointed at.
    pub const FILE_NAME: &'static str = "Wiring.toml";

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration at `path`.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                log::debug!("Loading scan configuration from {}", path.display());
                Self::from_toml_str(&text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} not found, using the default scan configuration", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
