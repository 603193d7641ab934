use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::response::{parse_app_guid, parse_first_route_domain, parse_total_results};
use crate::{CfError, Result};

pub const DEFAULT_BINARY: &str = "cf";

/// Handle on the cf command-line client.
///
/// Every method spawns the binary once and waits for it to exit. Mutating
/// commands inherit the terminal so the operator sees the client's own
/// progress output; queries capture stdout instead.
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: PathBuf,
    cf_home: Option<PathBuf>,
}

impl Default for CfCli {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl CfCli {
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            cf_home: None,
        }
    }

    /// Run the client with `CF_HOME` pointing at `cf_home`.
    #[must_use]
    pub fn with_cf_home(mut self, cf_home: impl Into<PathBuf>) -> Self {
        self.cf_home = Some(cf_home.into());
        self
    }

    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    #[must_use]
    pub fn cf_home(&self) -> Option<&Path> {
        self.cf_home.as_deref()
    }

    fn command<I, S>(&self, args: I) -> (Command, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let rendered = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");

        let mut command = Command::new(&self.binary);
        command.args(&args);
        if let Some(cf_home) = &self.cf_home {
            command.env("CF_HOME", cf_home);
        }
        (command, rendered)
    }

    fn spawn_error(&self, source: std::io::Error) -> CfError {
        CfError::Spawn {
            binary: self.binary.clone(),
            source,
        }
    }

    /// Run a command with the terminal attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be started or exits unsuccessfully.
    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (mut command, rendered) = self.command(args);
        debug!(command = %rendered, "running cf");

        let status = command
            .stdin(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(CfError::CommandFailed {
                command: rendered,
                code: status.code(),
                stderr: String::new(),
            })
        }
    }

    /// Run a command and return its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be started or exits unsuccessfully.
    pub fn capture<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (mut command, rendered) = self.command(args);
        debug!(command = %rendered, "querying cf");

        let Output {
            status,
            stdout,
            stderr,
        } = command
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if status.success() {
            Ok(String::from_utf8_lossy(&stdout).into_owned())
        } else {
            Err(CfError::CommandFailed {
                command: rendered,
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            })
        }
    }

    /// # Errors
    ///
    /// Returns an error if `cf push` fails.
    pub fn push(&self, name: &str, manifest: &Path, app_path: Option<&Path>) -> Result<()> {
        let mut args: Vec<&OsStr> = vec![
            OsStr::new("push"),
            OsStr::new(name),
            OsStr::new("-f"),
            manifest.as_os_str(),
        ];
        if let Some(app_path) = app_path {
            args.push(OsStr::new("-p"));
            args.push(app_path.as_os_str());
        }
        self.run(args)
    }

    /// # Errors
    ///
    /// Returns an error if `cf rename` fails.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.run(["rename", old_name, new_name])
    }

    /// # Errors
    ///
    /// Returns an error if `cf stop` fails.
    pub fn stop(&self, name: &str) -> Result<()> {
        self.run(["stop", name])
    }

    /// Delete without prompting for confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf delete` fails.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.run(["delete", name, "-f"])
    }

    /// # Errors
    ///
    /// Returns an error if `cf unmap-route` fails.
    pub fn unmap_route(&self, app: &str, domain: &str, host: &str) -> Result<()> {
        self.run(["unmap-route", app, domain, "-n", host])
    }

    /// # Errors
    ///
    /// Returns an error if `cf apps` fails.
    pub fn apps(&self) -> Result<()> {
        self.run(["apps"])
    }

    /// # Errors
    ///
    /// Returns an error if `cf curl` fails.
    pub fn curl(&self, path: &str) -> Result<String> {
        self.capture(["curl", path])
    }

    /// Number of applications named `name` in the given space.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the response is malformed.
    pub fn app_count(&self, name: &str, space_guid: &str) -> Result<u64> {
        let body = self.curl(&apps_query(name, space_guid))?;
        parse_total_results(&body)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or no application has that name.
    pub fn app_guid(&self, name: &str, space_guid: &str) -> Result<String> {
        let body = self.curl(&apps_query(name, space_guid))?;
        parse_app_guid(&body, name)
    }

    /// Domain of the first route bound to application `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails or the application has no routes.
    pub fn first_route_domain(&self, name: &str, space_guid: &str) -> Result<String> {
        let guid = self.app_guid(name, space_guid)?;
        let body = self.curl(&format!(
            "v2/apps/{}/routes?inline-relations-depth=1",
            query_escape(&guid)
        ))?;
        parse_first_route_domain(&body, name)
    }
}

fn query_escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// API path listing applications named `name` in a space.
#[must_use]
pub fn apps_query(name: &str, space_guid: &str) -> String {
    format!(
        "v2/apps?q=name:{}&q=space_guid:{}",
        query_escape(name),
        query_escape(space_guid)
    )
}
