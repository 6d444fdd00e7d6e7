// Copyright 2024 OctoFHIR Team
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

//! CLI configuration file support

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::Cli;

/// Configuration loaded from .plcrc or ~/.config/plc/config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Disable colored output by default
    #[serde(default)]
    pub no_color: bool,

    /// Default call depth limit for `run`
    #[serde(default)]
    pub max_call_depth: Option<usize>,

    /// Analyze before running unless `--no-check` is given
    #[serde(default = "default_true")]
    pub check_before_run: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            max_call_depth: None,
            check_before_run: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl CliConfig {
    /// Load configuration from standard locations
    ///
    /// Search order:
    /// 1. ./.plcrc (current directory)
    /// 2. ~/.config/plc/config.toml
    pub fn load() -> anyhow::Result<Self> {
        let local = Path::new(".plcrc");
        if local.exists() {
            return Self::load_from_file(local);
        }

        if let Some(path) = Self::default_path()
            && path.exists()
        {
            return Self::load_from_file(&path);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// User-level config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("plc").join("config.toml"))
    }

    /// Load the file named by `--config`, or search the standard locations
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        match &cli.config {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: CliConfig = toml::from_str("no_color = true").unwrap();
        assert!(config.no_color);
        assert!(config.check_before_run);
        assert_eq!(config.max_call_depth, None);
    }

    #[test]
    fn all_keys() {
        let config: CliConfig =
            toml::from_str("max_call_depth = 64\ncheck_before_run = false").unwrap();
        assert_eq!(
            config,
            CliConfig {
                no_color: false,
                max_call_depth: Some(64),
                check_before_run: false,
            }
        );
    }
}
