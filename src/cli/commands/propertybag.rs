use clap::{Args, Subcommand};

#[derive(Args)]
pub struct PropBagCommands {
    #[command(subcommand)]
    pub command: PropBagSubcommands,
}

#[derive(Subcommand)]
pub enum PropBagSubcommands {
    /// Read a property bag key
    Get {
        /// Key name
        key: String,
    },
    /// Write a property bag key
    Set {
        /// Key name
        key: String,
        /// Value to store
        value: String,
    },
}
