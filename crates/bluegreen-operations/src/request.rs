use std::path::{Path, PathBuf};

use tracing::warn;

use crate::slots::{SlotNames, is_managed_slot};
use crate::{OperationError, Result};

/// What the caller asked to deploy, as received from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub app_name: String,
    pub manifest_path: Option<PathBuf>,
    pub app_path: Option<PathBuf>,
}

impl DeploymentRequest {
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_manifest(mut self, manifest_path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(manifest_path.into());
        self
    }

    #[must_use]
    pub fn with_app_path(mut self, app_path: impl Into<PathBuf>) -> Self {
        self.app_path = Some(app_path.into());
        self
    }

    /// Check the request before anything touches the platform.
    ///
    /// Empty paths count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::EmptyAppName`] or
    /// [`OperationError::MissingManifest`].
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let app_name = self.app_name.trim();
        if app_name.is_empty() {
            return Err(OperationError::EmptyAppName);
        }

        let manifest_path = non_empty(self.manifest_path.as_deref())
            .ok_or(OperationError::MissingManifest)?;

        if is_managed_slot(app_name) {
            warn!(app = app_name, "application name carries a managed slot suffix");
        }

        Ok(ValidatedRequest {
            slots: SlotNames::new(app_name),
            manifest_path,
            app_path: non_empty(self.app_path.as_deref()),
        })
    }
}

fn non_empty(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    slots: SlotNames,
    manifest_path: PathBuf,
    app_path: Option<PathBuf>,
}

impl ValidatedRequest {
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.slots.live
    }

    #[must_use]
    pub fn slots(&self) -> &SlotNames {
        &self.slots
    }

    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    #[must_use]
    pub fn app_path(&self) -> Option<&Path> {
        self.app_path.as_deref()
    }
}
