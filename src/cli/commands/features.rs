use clap::{Args, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::api::FeatureScope;

/// clap-facing scope value; the api type stays clap-free.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    Web,
    Site,
}

impl From<ScopeArg> for FeatureScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Web => FeatureScope::Web,
            ScopeArg::Site => FeatureScope::Site,
        }
    }
}

#[derive(Args)]
pub struct FeatureCommands {
    #[command(subcommand)]
    pub command: FeatureSubcommands,
}

#[derive(Subcommand)]
pub enum FeatureSubcommands {
    /// List activated features
    List {
        #[arg(long, value_enum, default_value = "web")]
        scope: ScopeArg,
    },
    /// Activate a feature by definition id
    Activate {
        /// Feature definition id (GUID)
        id: Uuid,
        #[arg(long, value_enum, default_value = "web")]
        scope: ScopeArg,
        #[arg(long)]
        force: bool,
    },
    /// Deactivate a feature by definition id
    Deactivate {
        /// Feature definition id (GUID)
        id: Uuid,
        #[arg(long, value_enum, default_value = "web")]
        scope: ScopeArg,
        #[arg(long)]
        force: bool,
    },
    /// Toggle app side-loading on the site collection
    Sideloading {
        #[arg(value_parser = clap::value_parser!(bool))]
        on: bool,
    },
}
