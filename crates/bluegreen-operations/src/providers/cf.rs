use std::path::Path;
use std::sync::OnceLock;

use bluegreen_cf::{CfCli, CfConfig};
use tracing::debug;

use crate::Result;
use crate::traits::Platform;

/// [`Platform`] backed by the `cf` command-line client.
///
/// Existence checks are scoped to the space the client currently targets.
/// The space is read from the client's config file on first use.
pub struct CfPlatform {
    cli: CfCli,
    space_guid: OnceLock<String>,
}

impl CfPlatform {
    #[must_use]
    pub fn new(cli: CfCli) -> Self {
        Self {
            cli,
            space_guid: OnceLock::new(),
        }
    }

    /// Use a known space instead of reading the client's config file.
    #[must_use]
    pub fn with_space_guid(cli: CfCli, space_guid: impl Into<String>) -> Self {
        let platform = Self::new(cli);
        let _ = platform.space_guid.set(space_guid.into());
        platform
    }

    #[must_use]
    pub fn cli(&self) -> &CfCli {
        &self.cli
    }

    fn space_guid(&self) -> Result<&str> {
        if let Some(guid) = self.space_guid.get() {
            return Ok(guid);
        }
        let config = CfConfig::load(self.cli.cf_home())?;
        let space = config.current_space()?;
        debug!(space = %space.name, guid = %space.guid, "resolved target space");
        Ok(self.space_guid.get_or_init(|| space.guid.clone()))
    }
}

impl Platform for CfPlatform {
    fn exists(&self, name: &str) -> Result<bool> {
        let count = self.cli.app_count(name, self.space_guid()?)?;
        Ok(count == 1)
    }

    fn push(&self, name: &str, manifest: &Path, app_path: Option<&Path>) -> Result<()> {
        Ok(self.cli.push(name, manifest, app_path)?)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        Ok(self.cli.rename(old_name, new_name)?)
    }

    fn stop(&self, name: &str) -> Result<()> {
        Ok(self.cli.stop(name)?)
    }

    fn delete(&self, name: &str) -> Result<()> {
        Ok(self.cli.delete(name)?)
    }

    fn unmap_route(&self, source_app: &str, host_name: &str) -> Result<()> {
        let domain = self.cli.first_route_domain(source_app, self.space_guid()?)?;
        Ok(self.cli.unmap_route(source_app, &domain, host_name)?)
    }

    fn list_applications(&self) -> Result<()> {
        Ok(self.cli.apps()?)
    }
}
