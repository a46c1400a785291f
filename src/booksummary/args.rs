use booksummary::model::Tier;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "booksummary")]
#[command(about = "Keep short book summaries in private, external or shared storage")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the platform capability level from the config file
    #[arg(long, global = true)]
    pub api_level: Option<u32>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List summaries in every tier
    #[command(alias = "ls")]
    List,

    /// Save a summary (overwrites one with the same name)
    #[command(alias = "n")]
    Save {
        /// Tier: internal, private-external or shared
        tier: Tier,

        /// Name of the summary (".txt" is added if missing)
        name: String,

        /// Summary text
        #[arg(num_args = 0..)]
        body: Vec<String>,
    },

    /// Replace the text of an existing summary
    #[command(alias = "e")]
    Update {
        /// Tier the summary lives in
        tier: Tier,

        /// Exact stored name, e.g. "Dune.txt"
        name: String,

        /// New summary text
        #[arg(required = true, num_args = 1..)]
        body: Vec<String>,
    },

    /// Delete a summary
    #[command(alias = "rm")]
    Delete {
        /// Tier the summary lives in
        tier: Tier,

        /// Exact stored name, e.g. "Dune.txt"
        name: String,
    },

    /// Subscribe to the listing and print what it emits
    Watch,

    /// Grant access to a shared directory tree
    Grant {
        /// Directory holding shared summaries
        dir: String,
    },

    /// Forget the shared directory grant
    Revoke,
}
