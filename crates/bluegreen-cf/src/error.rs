use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CfError {
    #[error("failed to run '{binary}'")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`cf {command}` exited with {}{}", exit_description(*code), stderr_suffix(stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("malformed response from the platform API")]
    Json(#[from] serde_json::Error),

    #[error("missing total_results from API response")]
    MissingTotalResults,

    #[error("total_results is not a number: {value}")]
    InvalidTotalResults { value: String },

    #[error("application '{name}' not found in the targeted space")]
    AppNotFound { name: String },

    #[error("application '{app}' has no routes bound")]
    NoRoutes { app: String },

    #[error("failed to read cf config at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cf config at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no space targeted; run `cf target -s <space>` first")]
    NoTargetSpace,

    #[error("cannot locate the cf config directory: neither CF_HOME nor a home directory is set")]
    NoHomeDirectory,
}

fn exit_description(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |code| format!("status {code}"))
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
