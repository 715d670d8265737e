//! Provision command

use anyhow::Result;
use corekit_core::SystemRunner;
use corekit_provision::{parse_config_index, Provisioner};
use std::sync::Arc;

use crate::cli::ProvisionArgs;
use crate::output;

pub async fn run(args: ProvisionArgs) -> Result<i32> {
    let index = parse_config_index(&args.config)?;

    let mut provisioner =
        Provisioner::new(Arc::new(SystemRunner)).with_binaries_dir(args.binaries.as_std_path());
    if let Some(tools) = &args.tools_dir {
        provisioner = provisioner.with_tools_dir(tools.as_std_path());
    }

    let spinner = output::spinner(&format!(
        "Flashing config {} to '{}'...",
        index, args.board
    ));
    let result = provisioner.provision(&args.board, index).await;
    spinner.finish_and_clear();
    result?;

    output::success(&format!(
        "Provisioned '{}' with config {}",
        args.board, index
    ));
    Ok(0)
}
