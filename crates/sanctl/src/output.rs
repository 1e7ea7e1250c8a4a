//! Output formatting: table or JSON.
//!
//! Table rendering uses `tabled`; JSON serializes the original wire
//! data so nothing is lost to the row projection.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use sanctl_core::{PairStatus, ReplicationPair};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "GROUP")]
    group: String,
    #[tabled(rename = "PAIR")]
    pair: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "PVOL")]
    pvol: String,
    #[tabled(rename = "PVOL-STATUS")]
    pvol_status: String,
    #[tabled(rename = "SVOL")]
    svol: String,
    #[tabled(rename = "SVOL-STATUS")]
    svol_status: String,
}

/// Render a pair in the chosen format.
pub fn print_pair(format: OutputFormat, pair: &ReplicationPair) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => print_json(pair),
        OutputFormat::Table => {
            let row = PairRow {
                group: pair.copy_group_name.clone(),
                pair: pair.copy_pair_name.clone(),
                kind: pair.replication_type.clone().unwrap_or_default(),
                pvol: pair.pvol_ldev_id.map(|v| v.to_string()).unwrap_or_default(),
                pvol_status: colorize_status(pair.pvol_state()),
                svol: pair.svol_ldev_id.map(|v| v.to_string()).unwrap_or_default(),
                svol_status: colorize_status(pair.svol_state()),
            };
            let mut table = Table::new([row]);
            table.with(Style::sharp());
            println!("{table}");
            Ok(())
        }
    }
}

fn colorize_status(status: PairStatus) -> String {
    match status {
        PairStatus::Synchronized => status.to_string().green().to_string(),
        PairStatus::SplitPrimary | PairStatus::SplitSecondary | PairStatus::Copying => {
            status.to_string().yellow().to_string()
        }
        PairStatus::SuspendedError => status.to_string().red().to_string(),
        _ => status.to_string(),
    }
}

/// Print a list of identifiers, one per line.
pub fn print_ids(ids: &[String]) {
    for id in ids {
        println!("{id}");
    }
}
