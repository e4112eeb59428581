use clap::{Args, Subcommand};

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Add a named environment, prompting for credentials
    Setup {
        /// Environment name
        name: String,
        /// Site URL, e.g. https://contoso.sharepoint.com/sites/intranet
        url: String,
    },
    /// Show configured environments
    Status,
    /// Remove an environment
    Remove {
        /// Environment name
        name: String,
    },
    /// Make an environment the current one
    Select {
        /// Environment name
        name: String,
    },
}
