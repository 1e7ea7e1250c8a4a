//! `sanctl job` -- inspect or await asynchronous jobs.

use crate::cli::{GlobalOpts, JobArgs, JobCommand};
use crate::commands::util;
use crate::error::CliError;
use crate::{config, output};

pub async fn handle(args: JobArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;
    let client = util::local_client(&resolved)?;

    match args.command {
        JobCommand::Status { job_id } => {
            let raw = client
                .conn()
                .get(&format!("v1/objects/jobs/{job_id}"))
                .await
                .map_err(sanctl_core::CoreError::from)?;
            output::print_json(&raw)?;
        }

        JobCommand::Wait { job_id } => {
            let resource = client.await_job(&job_id).await?;
            println!("{resource}");
        }
    }

    Ok(())
}
