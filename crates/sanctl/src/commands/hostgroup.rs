//! `sanctl hostgroup` -- host group maintenance.

use sanctl_core::hostgroup;

use crate::cli::{GlobalOpts, HostGroupArgs, HostGroupCommand};
use crate::commands::util;
use crate::error::CliError;
use crate::{config, output};

pub async fn handle(args: HostGroupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;
    let client = util::local_client(&resolved)?;

    match args.command {
        HostGroupCommand::Paths { port, number } => {
            let paths = hostgroup::list_lun_paths(&client, &port, number).await?;
            output::print_ids(&paths);
        }

        HostGroupCommand::Teardown { port, number } => {
            hostgroup::delete_host_group(&client, &port, number).await?;
            println!("{}", hostgroup::host_group_id(&port, number));
        }
    }

    Ok(())
}
