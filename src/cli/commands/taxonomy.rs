use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::ops::taxonomy::{DEFAULT_DELIMITER, DEFAULT_LCID};

#[derive(Args)]
pub struct TaxonomyCommands {
    #[command(subcommand)]
    pub command: TaxonomySubcommands,
}

#[derive(Subcommand)]
pub enum TaxonomySubcommands {
    /// Import term paths such as 'Company|Locations|Stockholm'
    Import {
        /// Term paths; omit when using --path
        terms: Vec<String>,
        /// File with one term path per line
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_LCID)]
        lcid: u32,
        #[arg(long, default_value = DEFAULT_DELIMITER)]
        delimiter: String,
    },
    /// Resolve a term path and print the leaf item
    Get {
        /// Term path, e.g. 'Company|Locations'
        term: String,
        #[arg(long, default_value = DEFAULT_DELIMITER)]
        delimiter: String,
    },
}
