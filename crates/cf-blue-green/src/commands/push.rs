use bluegreen_operations::operations::{PushInput, PushOperation, PushOutcome};
use bluegreen_operations::providers::CfPlatform;

use super::{Context, PushArgs};
use crate::error::Result;
use crate::output;

pub(crate) fn run(args: PushArgs, context: &Context) -> Result<()> {
    let cli = context.config.cf_cli(context.cf_binary.as_deref());
    let operation = PushOperation::new(CfPlatform::new(cli));
    let input = PushInput {
        request: args.target.request(),
        dry_run: args.dry_run,
    };

    match operation.execute(&input)? {
        PushOutcome::DryRun(plan) => output::print_dry_run(&plan),
        PushOutcome::Deployed(report) => {
            output::print_deployed(&report);
            if context.config.deploy.list_apps {
                operation.list_applications();
            }
        }
    }

    Ok(())
}
