use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bluegreen_cf::CfError;

use crate::traits::Platform;
use crate::{OperationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Exists,
    Push,
    Rename,
    Stop,
    Delete,
    UnmapRoute,
    ListApplications,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Exists(String),
    Push {
        name: String,
        manifest: PathBuf,
        app_path: Option<PathBuf>,
    },
    Rename {
        from: String,
        to: String,
    },
    Stop(String),
    Delete(String),
    UnmapRoute {
        app: String,
        host: String,
    },
    ListApplications,
}

impl PlatformCall {
    #[must_use]
    pub fn rename(from: &str, to: &str) -> Self {
        Self::Rename {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[must_use]
    pub fn push(name: &str, manifest: &str) -> Self {
        Self::Push {
            name: name.to_string(),
            manifest: PathBuf::from(manifest),
            app_path: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> CallKind {
        match self {
            Self::Exists(_) => CallKind::Exists,
            Self::Push { .. } => CallKind::Push,
            Self::Rename { .. } => CallKind::Rename,
            Self::Stop(_) => CallKind::Stop,
            Self::Delete(_) => CallKind::Delete,
            Self::UnmapRoute { .. } => CallKind::UnmapRoute,
            Self::ListApplications => CallKind::ListApplications,
        }
    }

    fn subject(&self) -> Option<&str> {
        match self {
            Self::Exists(name)
            | Self::Push { name, .. }
            | Self::Stop(name)
            | Self::Delete(name)
            | Self::Rename { from: name, .. }
            | Self::UnmapRoute { app: name, .. } => Some(name),
            Self::ListApplications => None,
        }
    }
}

impl fmt::Display for PlatformCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists(name) => write!(f, "exists {name}"),
            Self::Push { name, manifest, .. } => write!(f, "push {name} -f {}", manifest.display()),
            Self::Rename { from, to } => write!(f, "rename {from} {to}"),
            Self::Stop(name) => write!(f, "stop {name}"),
            Self::Delete(name) => write!(f, "delete {name} -f"),
            Self::UnmapRoute { app, host } => write!(f, "unmap-route {app} -n {host}"),
            Self::ListApplications => write!(f, "apps"),
        }
    }
}

/// Simulated state of one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockApp {
    /// Incremented on every push; apps present at construction start at 0.
    pub revision: u32,
    pub started: bool,
    pub routed: bool,
}

/// In-memory platform that records every call and can be told to fail.
///
/// Renames, deletes, pushes, stops and unmaps update a simulated set of
/// applications so tests can assert on the final state. An injected push
/// failure still creates a stopped, unrouted application, like a push whose
/// application fails to start.
#[derive(Debug, Default)]
pub struct MockPlatform {
    apps: Mutex<BTreeMap<String, MockApp>>,
    calls: Mutex<Vec<PlatformCall>>,
    failures: Vec<(CallKind, Option<String>)>,
    next_revision: Mutex<u32>,
}

impl MockPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_apps<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let apps = names
            .into_iter()
            .map(|name| {
                (
                    name.into(),
                    MockApp {
                        revision: 0,
                        started: true,
                        routed: true,
                    },
                )
            })
            .collect();
        Self {
            apps: Mutex::new(apps),
            ..Self::default()
        }
    }

    /// Fail every call of `kind` whose subject is `name`.
    #[must_use]
    pub fn fail_on(mut self, kind: CallKind, name: &str) -> Self {
        self.failures.push((kind, Some(name.to_string())));
        self
    }

    /// Fail every call of `kind`.
    #[must_use]
    pub fn fail_all(mut self, kind: CallKind) -> Self {
        self.failures.push((kind, None));
        self
    }

    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Calls other than existence probes and listings.
    #[must_use]
    pub fn mutations(&self) -> Vec<PlatformCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, PlatformCall::Exists(_) | PlatformCall::ListApplications))
            .collect()
    }

    /// # Panics
    ///
    /// Panics if the app state mutex is poisoned.
    #[must_use]
    pub fn app(&self, name: &str) -> Option<MockApp> {
        self.apps.lock().expect("apps lock").get(name).copied()
    }

    /// # Panics
    ///
    /// Panics if the app state mutex is poisoned.
    #[must_use]
    pub fn app_names(&self) -> Vec<String> {
        self.apps.lock().expect("apps lock").keys().cloned().collect()
    }

    fn record(&self, call: PlatformCall) -> Result<()> {
        let fails = self.failures.iter().any(|(kind, name)| {
            *kind == call.kind() && name.as_deref().is_none_or(|name| call.subject() == Some(name))
        });
        let rendered = call.to_string();
        self.calls.lock().expect("calls lock").push(call);

        if fails {
            Err(OperationError::Cf(CfError::CommandFailed {
                command: rendered,
                code: Some(1),
                stderr: "injected failure".to_string(),
            }))
        } else {
            Ok(())
        }
    }

    fn missing(name: &str) -> OperationError {
        OperationError::Cf(CfError::AppNotFound {
            name: name.to_string(),
        })
    }
}

impl Platform for MockPlatform {
    fn exists(&self, name: &str) -> Result<bool> {
        self.record(PlatformCall::Exists(name.to_string()))?;
        Ok(self.app(name).is_some())
    }

    fn push(&self, name: &str, manifest: &Path, app_path: Option<&Path>) -> Result<()> {
        let result = self.record(PlatformCall::Push {
            name: name.to_string(),
            manifest: manifest.to_path_buf(),
            app_path: app_path.map(Path::to_path_buf),
        });

        let mut revision = self.next_revision.lock().expect("revision lock");
        *revision += 1;
        let started = result.is_ok();
        self.apps.lock().expect("apps lock").insert(
            name.to_string(),
            MockApp {
                revision: *revision,
                started,
                routed: started,
            },
        );
        result
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.record(PlatformCall::rename(old_name, new_name))?;
        let mut apps = self.apps.lock().expect("apps lock");
        if apps.contains_key(new_name) {
            return Err(OperationError::Cf(CfError::CommandFailed {
                command: format!("rename {old_name} {new_name}"),
                code: Some(1),
                stderr: format!("App {new_name} already exists"),
            }));
        }
        let app = apps.remove(old_name).ok_or_else(|| Self::missing(old_name))?;
        apps.insert(new_name.to_string(), app);
        Ok(())
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.record(PlatformCall::Stop(name.to_string()))?;
        let mut apps = self.apps.lock().expect("apps lock");
        let app = apps.get_mut(name).ok_or_else(|| Self::missing(name))?;
        app.started = false;
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.record(PlatformCall::Delete(name.to_string()))?;
        self.apps.lock().expect("apps lock").remove(name);
        Ok(())
    }

    fn unmap_route(&self, source_app: &str, host_name: &str) -> Result<()> {
        self.record(PlatformCall::UnmapRoute {
            app: source_app.to_string(),
            host: host_name.to_string(),
        })?;
        let mut apps = self.apps.lock().expect("apps lock");
        let app = apps
            .get_mut(source_app)
            .ok_or_else(|| Self::missing(source_app))?;
        app.routed = false;
        Ok(())
    }

    fn list_applications(&self) -> Result<()> {
        self.record(PlatformCall::ListApplications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() -> anyhow::Result<()> {
        let platform = MockPlatform::with_apps(["shop"]);

        assert!(platform.exists("shop")?);
        assert!(!platform.exists("shop-g1")?);
        platform.rename("shop", "shop-g1")?;

        assert_eq!(
            platform.calls(),
            vec![
                PlatformCall::Exists("shop".to_string()),
                PlatformCall::Exists("shop-g1".to_string()),
                PlatformCall::rename("shop", "shop-g1"),
            ]
        );
        assert_eq!(platform.app_names(), vec!["shop-g1".to_string()]);
        Ok(())
    }

    #[test]
    fn injected_failure_matches_kind_and_subject() {
        let platform = MockPlatform::with_apps(["a", "b"]).fail_on(CallKind::Stop, "b");

        assert!(platform.stop("a").is_ok());
        assert!(platform.stop("b").is_err());
        assert_eq!(platform.call_count(), 2);
    }

    #[test]
    fn failed_push_leaves_stopped_app() {
        let platform = MockPlatform::new().fail_all(CallKind::Push);

        let result = platform.push("shop", Path::new("m.yml"), None);

        assert!(result.is_err());
        let app = platform.app("shop").expect("app created");
        assert!(!app.started);
        assert!(!app.routed);
    }

    #[test]
    fn rename_onto_existing_name_fails() {
        let platform = MockPlatform::with_apps(["a", "b"]);

        assert!(platform.rename("a", "b").is_err());
        assert!(platform.app("a").is_some());
    }
}
