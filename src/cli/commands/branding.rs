use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Args)]
pub struct BrandingCommands {
    #[command(subcommand)]
    pub command: BrandingSubcommands,
}

#[derive(Subcommand)]
pub enum BrandingSubcommands {
    /// Upload theme files and register a composite look entry
    DeployTheme {
        /// Name for the composite look entry
        name: String,
        /// Color palette file (.spcolor)
        #[arg(long)]
        color: Option<PathBuf>,
        /// Font scheme file (.spfont)
        #[arg(long)]
        font: Option<PathBuf>,
        /// Background image file
        #[arg(long)]
        background: Option<PathBuf>,
        /// Master page name (defaults to seattle.master)
        #[arg(long)]
        master_page: Option<String>,
    },
    /// Apply an existing composite look to the web
    SetTheme {
        /// Composite look entry name
        name: String,
    },
    /// Set the web's master page by file name
    SetMasterPage {
        /// Master page file name, e.g. contoso.master
        name: String,
        /// Set the custom (site) master page instead of the system one
        #[arg(long)]
        custom: bool,
    },
    /// Upload a master page to the master page gallery
    DeployMasterPage {
        /// Local .master file
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "15")]
        ui_version: String,
    },
    /// Upload a page layout to the master page gallery
    DeployPageLayout {
        /// Local .aspx file
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Associated content type id
        #[arg(long)]
        content_type_id: String,
    },
    /// Overwrite the themed site icon
    SetSiteLogo {
        /// Local image file; skipped silently when missing
        path: PathBuf,
    },
    /// Record a page layout as the web's default
    SetDefaultPageLayout {
        /// Page layout file name, e.g. ArticleLeft.aspx
        name: String,
    },
    /// Restrict which page layouts are offered on this web
    SetAvailablePageLayouts {
        /// Page layout file names
        names: Vec<String>,
    },
    /// Remove the page layout filter
    ClearPageLayouts,
    /// Inherit page layout settings from the parent web
    InheritPageLayouts,
    /// Restrict which web templates are offered, as lcid:name pairs
    /// (a bare name applies to all languages)
    SetAvailableWebTemplates {
        /// Entries such as 1033:STS#0 or BLANKINTERNET#0
        entries: Vec<String>,
    },
    /// Remove the web template filter
    ClearWebTemplates,
}
