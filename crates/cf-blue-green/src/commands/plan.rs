use bluegreen_operations::operations::PushOperation;
use bluegreen_operations::providers::CfPlatform;

use super::{Context, TargetArgs};
use crate::error::Result;
use crate::output;

pub(crate) fn run(args: TargetArgs, context: &Context) -> Result<()> {
    let cli = context.config.cf_cli(context.cf_binary.as_deref());
    let operation = PushOperation::new(CfPlatform::new(cli));

    let plan = operation.plan(&args.request())?;
    output::print_plan(&plan);

    Ok(())
}
