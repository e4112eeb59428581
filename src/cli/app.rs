use clap::{Parser, Subcommand};

use super::commands::auth::AuthCommands;
use super::commands::branding::BrandingCommands;
use super::commands::features::FeatureCommands;
use super::commands::navigation::NavCommands;
use super::commands::propertybag::PropBagCommands;
use super::commands::taxonomy::TaxonomyCommands;

#[derive(Parser)]
#[command(name = "spo-cli")]
#[command(about = "A CLI tool for SharePoint Online branding, navigation and taxonomy")]
pub struct Cli {
    /// Environment to use instead of the configured current one
    #[arg(short, long, global = true)]
    pub environment: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Environment and credential management
    Auth(AuthCommands),
    /// Themes, master pages and page layouts
    Branding(BrandingCommands),
    /// Quick launch and top navigation edits
    Nav(NavCommands),
    /// Term store import and lookup
    Taxonomy(TaxonomyCommands),
    /// Feature activation at web or site scope
    Features(FeatureCommands),
    /// Raw property bag access
    Propbag(PropBagCommands),
}
