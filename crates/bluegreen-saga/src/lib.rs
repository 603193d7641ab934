//! All-or-nothing execution of a sequence of side-effecting steps.
//!
//! Each [`Step`] pairs a forward [`Action`] with an optional compensation
//! that undoes it. A [`Saga`] runs the steps in order; when one fails, the
//! compensations of the steps that already completed run in reverse order.
//! The result is one of three outcomes: success, failed and rolled back
//! ([`SagaError::StepFailed`]), or failed during rollback
//! ([`SagaError::CompensationFailed`]).

mod action;
mod audit;
mod builder;
mod error;
mod saga;
mod step;

pub use action::{Action, BoxedAction};
pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::SagaBuilder;
pub use error::{CompensationError, SagaError};
pub use saga::Saga;
pub use step::Step;
