//! `sanctl pair` -- replication pair lifecycle.

use sanctl_core::{PairCreate, PairId, PairManager};

use crate::cli::{GlobalOpts, PairArgs, PairCommand, PairRef};
use crate::commands::util;
use crate::error::CliError;
use crate::{config, output};

pub async fn handle(args: PairArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;
    let manager = util::pair_manager(resolved)?;

    match args.command {
        PairCommand::Create {
            pair,
            pvol,
            svol,
            kind,
        } => {
            let spec = PairCreate {
                copy_group: pair.copy_group,
                pair_name: pair.pair_name,
                local_device_group: pair.local_device_group,
                remote_device_group: pair.remote_device_group,
                pvol_ldev_id: pvol,
                svol_ldev_id: svol,
                kind,
            };
            let id = manager.create(&spec).await?;
            println!("{id}");
        }

        PairCommand::Status { pair } => {
            let id = resolve_id(&manager, &pair).await?;
            let status = manager.status(&id).await?;
            output::print_pair(global.output, &status)?;
        }

        PairCommand::Split { pair, swap } => {
            let id = resolve_id(&manager, &pair).await?;
            manager.split(&id, swap).await?;
            println!("{id}");
        }

        PairCommand::Resync { pair, swap } => {
            let id = resolve_id(&manager, &pair).await?;
            manager.resync(&id, swap).await?;
            println!("{id}");
        }

        PairCommand::Delete { pair } => {
            let id = resolve_id(&manager, &pair).await?;
            manager.delete(&id).await?;
            println!("{id}");
        }

        PairCommand::Resize {
            pair,
            additional_blocks,
        } => {
            let id = resolve_id(&manager, &pair).await?;
            manager.resize(&id, additional_blocks).await?;
            println!("{id}");
        }
    }

    Ok(())
}

async fn resolve_id(manager: &PairManager, pair: &PairRef) -> Result<PairId, CliError> {
    Ok(manager
        .pair_id(
            &pair.copy_group,
            &pair.pair_name,
            pair.local_device_group.clone(),
            pair.remote_device_group.clone(),
        )
        .await?)
}
