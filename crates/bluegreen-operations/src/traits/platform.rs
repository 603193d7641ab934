use std::path::Path;

use crate::Result;

/// Operations on named applications in the targeted space.
///
/// Every call is synchronous and may fail independently. Implementations
/// perform no retries unless they document otherwise.
pub trait Platform: Send + Sync {
    /// True iff exactly one application with that name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot be queried or its response is malformed.
    fn exists(&self, name: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the push fails, including when the application does not start.
    fn push(&self, name: &str, manifest: &Path, app_path: Option<&Path>) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the application cannot be stopped.
    fn stop(&self, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the application cannot be deleted.
    fn delete(&self, name: &str) -> Result<()>;

    /// Unmap the route for `host_name` on the domain of `source_app`'s first route.
    ///
    /// # Errors
    ///
    /// Returns an error if the route cannot be looked up or unmapped.
    fn unmap_route(&self, source_app: &str, host_name: &str) -> Result<()>;

    /// Show the applications in the targeted space.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn list_applications(&self) -> Result<()>;
}
