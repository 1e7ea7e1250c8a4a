//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod config_cmd;
pub mod hostgroup;
pub mod job;
pub mod pair;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an array-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Pair(args) => pair::handle(args, global).await,
        Command::Job(args) => job::handle(args, global).await,
        Command::Hostgroup(args) => hostgroup::handle(args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
