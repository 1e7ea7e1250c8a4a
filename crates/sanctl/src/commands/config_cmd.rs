//! `sanctl config` -- show configuration.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub async fn handle(args: ConfigArgs, _global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let config = sanctl_config::load_config_or_default();
            let rendered = toml::to_string_pretty(&config).map_err(|e| CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            })?;
            println!("# {}", sanctl_config::config_path().display());
            print!("{rendered}");
        }

        ConfigCommand::Path => {
            println!("{}", sanctl_config::config_path().display());
        }
    }

    Ok(())
}
