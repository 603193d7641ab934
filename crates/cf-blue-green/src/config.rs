use std::path::{Path, PathBuf};

use bluegreen_cf::{CfCli, DEFAULT_BINARY};
use serde::Deserialize;

use crate::error::ConfigError;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "blue-green.toml";

/// Contents of `blue-green.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub cf: CfSection,
    #[serde(default)]
    pub deploy: DeploySection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CfSection {
    pub binary: Option<PathBuf>,
    /// Passed to the client as `CF_HOME`.
    pub home: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct DeploySection {
    #[serde(default = "default_list_apps")]
    pub list_apps: bool,
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            list_apps: default_list_apps(),
        }
    }
}

fn default_list_apps() -> bool {
    true
}

impl Config {
    /// Load `explicit`, or `blue-green.toml` in `dir` when it exists.
    pub(crate) fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = dir.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::read(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// Build the cf driver, letting `binary_override` win over the file.
    pub(crate) fn cf_cli(&self, binary_override: Option<&Path>) -> CfCli {
        let binary = binary_override
            .or(self.cf.binary.as_deref())
            .unwrap_or(Path::new(DEFAULT_BINARY));
        let cli = CfCli::new(binary);
        match &self.cf.home {
            Some(home) => cli.with_cf_home(home),
            None => cli,
        }
    }
}
