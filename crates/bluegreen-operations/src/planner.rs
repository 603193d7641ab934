//! Rotation planning.
//!
//! The planner turns the probed slot occupancy into an ordered list of
//! steps. Planning is pure: the same request and slot state always produce
//! the same plan, and nothing here talks to the platform.
//!
//! ```text
//! live absent:   push_new
//! live present:  [evict_two_back] [demote_previous] demote_live push_replacement cutover
//! ```
//!
//! Only `demote_live` carries a compensation. It fires when the replacement
//! push fails: the broken live application is deleted and the previous
//! version is renamed back, restoring the starting state. The push itself
//! is the pivot, so a failing cutover leaves the new version live.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::request::ValidatedRequest;
use crate::slots::{SlotNames, SlotState};
use crate::traits::Platform;

/// Logical kind of a planned step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Push a first version under the live name.
    PushNew,
    /// Delete the two-back slot.
    EvictTwoBack,
    /// Rename previous to two-back.
    DemotePrevious,
    /// Rename live to previous.
    DemoteLive,
    /// Push the new version under the live name.
    PushReplacement,
    /// Take the previous version out of traffic and stop it.
    Cutover,
}

impl StepKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PushNew => "push_new",
            Self::EvictTwoBack => "evict_two_back",
            Self::DemotePrevious => "demote_previous",
            Self::DemoteLive => "demote_live",
            Self::PushReplacement => "push_replacement",
            Self::Cutover => "cutover",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single call against the [`Platform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCommand {
    Push {
        name: String,
        manifest: PathBuf,
        app_path: Option<PathBuf>,
    },
    Rename {
        from: String,
        to: String,
    },
    Stop {
        name: String,
    },
    Delete {
        name: String,
    },
    UnmapRoute {
        app: String,
        host: String,
    },
}

impl PlatformCommand {
    /// # Errors
    ///
    /// Returns whatever error the platform reports for the call.
    pub fn apply<P: Platform + ?Sized>(&self, platform: &P) -> Result<()> {
        match self {
            Self::Push {
                name,
                manifest,
                app_path,
            } => platform.push(name, manifest, app_path.as_deref()),
            Self::Rename { from, to } => platform.rename(from, to),
            Self::Stop { name } => platform.stop(name),
            Self::Delete { name } => platform.delete(name),
            Self::UnmapRoute { app, host } => platform.unmap_route(app, host),
        }
    }
}

impl fmt::Display for PlatformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push {
                name,
                manifest,
                app_path,
            } => {
                write!(f, "push {name} -f {}", manifest.display())?;
                if let Some(app_path) = app_path {
                    write!(f, " -p {}", app_path.display())?;
                }
                Ok(())
            }
            Self::Rename { from, to } => write!(f, "rename {from} {to}"),
            Self::Stop { name } => write!(f, "stop {name}"),
            Self::Delete { name } => write!(f, "delete {name} -f"),
            Self::UnmapRoute { app, host } => write!(f, "unmap-route {app} -n {host}"),
        }
    }
}

/// What to do when a command inside a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Fail the step.
    #[default]
    Abort,
    /// Log a warning and continue with the next command of the step.
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: PlatformCommand,
    pub on_error: OnError,
}

impl CommandSpec {
    #[must_use]
    pub fn abort(command: PlatformCommand) -> Self {
        Self {
            command,
            on_error: OnError::Abort,
        }
    }

    #[must_use]
    pub fn warn(command: PlatformCommand) -> Self {
        Self {
            command,
            on_error: OnError::Warn,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.on_error {
            OnError::Abort => write!(f, "{}", self.command),
            OnError::Warn => write!(f, "{} (failure tolerated)", self.command),
        }
    }
}

/// One step of a plan, as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub kind: StepKind,
    pub forward: Vec<CommandSpec>,
    pub compensate: Option<Vec<CommandSpec>>,
    pub pivot: bool,
}

impl PlannedStep {
    fn new(kind: StepKind, forward: Vec<CommandSpec>) -> Self {
        Self {
            kind,
            forward,
            compensate: None,
            pivot: false,
        }
    }

    fn with_compensation(mut self, compensate: Vec<CommandSpec>) -> Self {
        self.compensate = Some(compensate);
        self
    }

    fn as_pivot(mut self) -> Self {
        self.pivot = true;
        self
    }
}

/// The ordered steps for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    slots: SlotNames,
    state: SlotState,
    steps: Vec<PlannedStep>,
}

impl DeploymentPlan {
    #[must_use]
    pub fn slots(&self) -> &SlotNames {
        &self.slots
    }

    #[must_use]
    pub fn state(&self) -> SlotState {
        self.state
    }

    #[must_use]
    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|step| step.kind).collect()
    }

    /// Whether the plan replaces an existing live application.
    #[must_use]
    pub fn is_rotation(&self) -> bool {
        self.state.live
    }

    /// Human-readable listing of the plan.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![format!("{} ({})", self.slots.live, self.state)];
        for (index, step) in self.steps.iter().enumerate() {
            let pivot = if step.pivot { " [point of no return]" } else { "" };
            lines.push(format!("{}. {}{pivot}", index + 1, step.kind));
            for spec in &step.forward {
                lines.push(format!("     cf {spec}"));
            }
            if let Some(compensate) = &step.compensate {
                lines.push("   if a later step fails:".to_string());
                for spec in compensate {
                    lines.push(format!("     cf {spec}"));
                }
            }
        }
        lines.join("\n")
    }
}

/// Plan the steps that take the platform from `state` to the requested
/// deployment.
#[must_use]
pub fn plan(request: &ValidatedRequest, state: SlotState) -> DeploymentPlan {
    let slots = request.slots().clone();
    let push = push_command(&slots.live, request.manifest_path(), request.app_path());

    let steps = if state.live {
        rotation_steps(&slots, state, push)
    } else {
        vec![PlannedStep::new(StepKind::PushNew, vec![CommandSpec::abort(push)])]
    };

    DeploymentPlan {
        slots,
        state,
        steps,
    }
}

fn push_command(name: &str, manifest: &Path, app_path: Option<&Path>) -> PlatformCommand {
    PlatformCommand::Push {
        name: name.to_string(),
        manifest: manifest.to_path_buf(),
        app_path: app_path.map(Path::to_path_buf),
    }
}

fn rotation_steps(slots: &SlotNames, state: SlotState, push: PlatformCommand) -> Vec<PlannedStep> {
    let mut steps = Vec::with_capacity(5);

    if state.two_back {
        steps.push(PlannedStep::new(
            StepKind::EvictTwoBack,
            vec![CommandSpec::abort(PlatformCommand::Delete {
                name: slots.two_back.clone(),
            })],
        ));
    }

    if state.previous {
        steps.push(PlannedStep::new(
            StepKind::DemotePrevious,
            vec![CommandSpec::abort(PlatformCommand::Rename {
                from: slots.previous.clone(),
                to: slots.two_back.clone(),
            })],
        ));
    }

    // A failed push may never have created the live app, so the delete is
    // allowed to fail; the rename back is what restores service.
    steps.push(
        PlannedStep::new(
            StepKind::DemoteLive,
            vec![CommandSpec::abort(PlatformCommand::Rename {
                from: slots.live.clone(),
                to: slots.previous.clone(),
            })],
        )
        .with_compensation(vec![
            CommandSpec::warn(PlatformCommand::Delete {
                name: slots.live.clone(),
            }),
            CommandSpec::abort(PlatformCommand::Rename {
                from: slots.previous.clone(),
                to: slots.live.clone(),
            }),
        ]),
    );

    steps.push(PlannedStep::new(StepKind::PushReplacement, vec![CommandSpec::abort(push)]).as_pivot());

    steps.push(PlannedStep::new(
        StepKind::Cutover,
        vec![
            CommandSpec::warn(PlatformCommand::UnmapRoute {
                app: slots.previous.clone(),
                host: slots.live.clone(),
            }),
            CommandSpec::abort(PlatformCommand::Stop {
                name: slots.previous.clone(),
            }),
        ],
    ));

    steps
}
