use clap::{Args, Subcommand};

#[derive(Args)]
pub struct NavCommands {
    #[command(subcommand)]
    pub command: NavSubcommands,
}

#[derive(Subcommand)]
pub enum NavSubcommands {
    /// Add a navigation node
    Add {
        /// Node title
        title: String,
        /// Node link; empty makes a heading
        #[arg(long, default_value = "")]
        url: String,
        /// Title of the quick launch node to nest under
        #[arg(long, default_value = "")]
        parent: String,
        /// Add to the top navigation bar instead of the quick launch
        #[arg(long)]
        top: bool,
    },
    /// Delete a navigation node by title
    Remove {
        /// Node title
        title: String,
        /// Title of the quick launch node it nests under
        #[arg(long, default_value = "")]
        parent: String,
        /// Delete from the top navigation bar instead of the quick launch
        #[arg(long)]
        top: bool,
    },
    /// Delete every quick launch node
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Turn navigation inheritance from the parent web on or off
    Inherit {
        #[arg(value_parser = clap::value_parser!(bool))]
        enabled: bool,
    },
}
