use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dbk", about = concat!("[>] daybook v", env!("CARGO_PKG_VERSION"), " - tasks, day plans, and notes"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write all data to a single JSON file
    Export(ExportArgs),
    /// Restore all data from an exported JSON file
    Import(ImportArgs),
    /// Manage task groups within categories
    Group(GroupArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// Destination file (default: daybook-export.json)
    pub file: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Export file to restore from
    pub file: String,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// Add a group under a category (both by name)
    Add { category: String, name: String },
    /// Rename a group
    Rename { name: String, new_name: String },
    /// Remove a group; its tasks become ungrouped
    Rm { name: String },
}
