//! Argument definitions for the `sanctl` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use sanctl_core::PairKind;

#[derive(Parser)]
#[command(
    name = "sanctl",
    version,
    about = "Manage storage array replication pairs, jobs, and host groups"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct GlobalOpts {
    /// Profile name from the config file.
    #[arg(long, short = 'p', global = true, env = "SANCTL_PROFILE")]
    pub profile: Option<String>,

    /// Local array URL (overrides the profile).
    #[arg(long, global = true, env = "SANCTL_ARRAY")]
    pub array: Option<String>,

    /// Username for the local array.
    #[arg(long, global = true, env = "SANCTL_USERNAME")]
    pub username: Option<String>,

    /// Password for the local array. Prefer the env var over the flag.
    #[arg(long, global = true, env = "SANCTL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip TLS certificate verification.
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "SANCTL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Output format.
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replication pair operations (span the local and secondary array).
    Pair(PairArgs),

    /// Inspect or await asynchronous jobs.
    Job(JobArgs),

    /// Host group maintenance.
    Hostgroup(HostGroupArgs),

    /// Show configuration.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

// ── Pair ────────────────────────────────────────────────────────────

#[derive(Args)]
pub struct PairArgs {
    #[command(subcommand)]
    pub command: PairCommand,
}

/// Shared addressing for an existing pair.
#[derive(Args)]
pub struct PairRef {
    /// Copy group name.
    #[arg(long)]
    pub copy_group: String,

    /// Pair name within the copy group.
    #[arg(long)]
    pub pair_name: String,

    /// Local device group (defaults to `{copy_group}P_`).
    #[arg(long)]
    pub local_device_group: Option<String>,

    /// Remote device group (defaults to `{copy_group}S_`).
    #[arg(long)]
    pub remote_device_group: Option<String>,
}

#[derive(Subcommand)]
pub enum PairCommand {
    /// Create a replication pair.
    Create {
        #[command(flatten)]
        pair: PairRef,

        /// Primary volume (LDEV id) on the local array.
        #[arg(long)]
        pvol: i64,

        /// Secondary volume (LDEV id) on the secondary array.
        #[arg(long)]
        svol: i64,

        /// Replication flavor.
        #[arg(long, default_value = "SYNC", value_parser = parse_kind)]
        kind: PairKind,
    },

    /// Show the pair's current status.
    Status {
        #[command(flatten)]
        pair: PairRef,
    },

    /// Split (suspend) the pair.
    Split {
        #[command(flatten)]
        pair: PairRef,

        /// Reverse the primary role while splitting.
        #[arg(long)]
        swap: bool,
    },

    /// Resynchronize a split pair.
    Resync {
        #[command(flatten)]
        pair: PairRef,

        /// Reverse the copy direction while resyncing.
        #[arg(long)]
        swap: bool,
    },

    /// Dissolve the pair (volumes survive).
    Delete {
        #[command(flatten)]
        pair: PairRef,
    },

    /// Expand both volumes of the pair (split -> expand -> resync).
    Resize {
        #[command(flatten)]
        pair: PairRef,

        /// Additional capacity in blocks.
        #[arg(long)]
        additional_blocks: u64,
    },
}

fn parse_kind(raw: &str) -> Result<PairKind, String> {
    raw.parse()
        .map_err(|_| format!("expected SYNC, ASYNC, or ACTIVE_ACTIVE, got '{raw}'"))
}

// ── Job ─────────────────────────────────────────────────────────────

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Show a job's raw status.
    Status {
        /// Job id as returned by a mutating call.
        job_id: String,
    },

    /// Poll a job until it reaches a terminal state.
    Wait {
        /// Job id as returned by a mutating call.
        job_id: String,
    },
}

// ── Host group ──────────────────────────────────────────────────────

#[derive(Args)]
pub struct HostGroupArgs {
    #[command(subcommand)]
    pub command: HostGroupCommand,
}

#[derive(Subcommand)]
pub enum HostGroupCommand {
    /// List LUN paths under a host group.
    Paths {
        /// Port id (e.g. CL1-A).
        #[arg(long)]
        port: String,

        /// Host group number on the port.
        #[arg(long)]
        number: u32,
    },

    /// Delete every LUN path under a host group, then the group itself.
    Teardown {
        /// Port id (e.g. CL1-A).
        #[arg(long)]
        port: String,

        /// Host group number on the port.
        #[arg(long)]
        number: u32,
    },
}

// ── Config / completions ────────────────────────────────────────────

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration.
    Show,

    /// Print the config file path.
    Path,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    pub shell: Shell,
}
