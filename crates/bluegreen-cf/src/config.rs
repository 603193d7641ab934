use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{CfError, Result};

const CONFIG_DIR: &str = ".cf";
const CONFIG_FILE: &str = "config.json";

/// Space currently targeted by the cf command-line client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Space {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// The subset of the cf client's `config.json` needed to scope API queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CfConfig {
    #[serde(rename = "SpaceFields", default)]
    space: Space,
}

impl CfConfig {
    /// Load the client configuration.
    ///
    /// `cf_home` takes precedence; otherwise the `CF_HOME` environment
    /// variable, then the user's home directory, is used, matching the
    /// lookup the cf client itself performs.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory can be determined or the file
    /// cannot be read or parsed.
    pub fn load(cf_home: Option<&Path>) -> Result<Self> {
        let home = match cf_home {
            Some(path) => path.to_path_buf(),
            None => default_cf_home(
                std::env::var_os("CF_HOME"),
                std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")),
            )?,
        };
        Self::read(&config_path(&home))
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CfError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| CfError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The targeted space.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::NoTargetSpace`] if no space is targeted.
    pub fn current_space(&self) -> Result<&Space> {
        if self.space.guid.is_empty() {
            return Err(CfError::NoTargetSpace);
        }
        Ok(&self.space)
    }
}

fn default_cf_home(cf_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    cf_home
        .filter(|value| !value.is_empty())
        .or(home)
        .map(PathBuf::from)
        .ok_or(CfError::NoHomeDirectory)
}

#[must_use]
pub fn config_path(cf_home: &Path) -> PathBuf {
    cf_home.join(CONFIG_DIR).join(CONFIG_FILE)
}
