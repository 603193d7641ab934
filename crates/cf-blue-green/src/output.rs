use std::error::Error;

use bluegreen_operations::OperationError;
use bluegreen_operations::operations::DeploymentReport;
use bluegreen_operations::planner::DeploymentPlan;

use crate::error::CliError;

pub(crate) const SUCCESS_MESSAGE: &str =
    "A new version of your application has successfully been pushed!";

pub(crate) fn print_plan(plan: &DeploymentPlan) {
    println!("{}", plan.render());
}

pub(crate) fn print_dry_run(plan: &DeploymentPlan) {
    println!("Dry run - no changes will be made.\n");
    print_plan(plan);
}

pub(crate) fn print_deployed(report: &DeploymentReport) {
    tracing::debug!(audit = %report.audit.summary(), "deployment finished");
    println!();
    println!("{SUCCESS_MESSAGE}");
    println!();
}

fn print_chain(label: &str, error: &dyn Error) {
    eprintln!("{label}: {error}");

    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = cause.source();
    }
}

pub(crate) fn print_error(error: &CliError) {
    print_chain("error", error);

    let CliError::Operation(operation_error) = error else {
        return;
    };

    if let OperationError::RollbackFailed {
        compensation_step,
        compensation_error,
        message,
        ..
    } = operation_error
    {
        eprintln!();
        print_chain(
            &format!("rollback of '{compensation_step}' failed"),
            &**compensation_error,
        );
        eprintln!();
        eprintln!("{message}");
    }

    if let Some(audit) = operation_error.audit() {
        eprintln!();
        eprintln!("{}", audit.summary());
    }
}
