use anyhow::Result;
use clap::Parser;
use log::info;

use spo_cli::api::{self, ClientContext, HttpTransport};
use spo_cli::cli::app::Commands;
use spo_cli::cli::commands::auth::AuthSubcommands;
use spo_cli::cli::commands::branding::BrandingSubcommands;
use spo_cli::cli::commands::features::FeatureSubcommands;
use spo_cli::cli::commands::navigation::NavSubcommands;
use spo_cli::cli::commands::propertybag::PropBagSubcommands;
use spo_cli::cli::commands::taxonomy::TaxonomySubcommands;
use spo_cli::cli::Cli;
use spo_cli::ops::branding::ThemeOption;
use spo_cli::{commands, config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("spo-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let mut config = config::Config::load()?;
    let cli = Cli::parse();
    info!("Starting spo-cli");

    // Auth commands work on the config alone, no site round trips.
    if let Commands::Auth(auth) = &cli.command {
        match &auth.command {
            AuthSubcommands::Setup { name, url } => {
                commands::auth::setup_command(&mut config, name, url)?;
            }
            AuthSubcommands::Status => commands::auth::status_command(&config)?,
            AuthSubcommands::Remove { name } => {
                commands::auth::remove_command(&mut config, name)?;
            }
            AuthSubcommands::Select { name } => {
                commands::auth::select_command(&mut config, name)?;
            }
        }
        return Ok(());
    }

    let (env_name, environment) = config.resolve_environment(cli.environment.as_deref())?;
    info!("Using environment '{}' at {}", env_name, environment.url);

    let http_client = api::build_http_client();
    let token = api::authenticate(&http_client, &environment.url, &environment.credentials).await?;
    let transport = HttpTransport::new(http_client, token.access_token);
    let mut ctx = ClientContext::new(environment.url.clone(), Box::new(transport));

    match cli.command {
        Commands::Auth(_) => unreachable!(),
        Commands::Branding(branding) => match branding.command {
            BrandingSubcommands::DeployTheme {
                name,
                color,
                font,
                background,
                master_page,
            } => {
                let theme = ThemeOption {
                    name,
                    color_file: color,
                    font_file: font,
                    background_image: background,
                    master_page,
                };
                commands::branding::deploy_theme_command(&mut ctx, &theme).await?;
            }
            BrandingSubcommands::SetTheme { name } => {
                commands::branding::set_theme_command(&mut ctx, &name).await?;
            }
            BrandingSubcommands::SetMasterPage { name, custom } => {
                commands::branding::set_master_page_command(&mut ctx, &name, custom).await?;
            }
            BrandingSubcommands::DeployMasterPage {
                path,
                title,
                description,
                ui_version,
            } => {
                commands::branding::deploy_master_page_command(
                    &mut ctx,
                    &path,
                    &title,
                    &description,
                    &ui_version,
                )
                .await?;
            }
            BrandingSubcommands::DeployPageLayout {
                path,
                title,
                description,
                content_type_id,
            } => {
                commands::branding::deploy_page_layout_command(
                    &mut ctx,
                    &path,
                    &title,
                    &description,
                    &content_type_id,
                )
                .await?;
            }
            BrandingSubcommands::SetSiteLogo { path } => {
                commands::branding::set_site_logo_command(&mut ctx, &path).await?;
            }
            BrandingSubcommands::SetDefaultPageLayout { name } => {
                commands::branding::set_default_page_layout_command(&mut ctx, &name).await?;
            }
            BrandingSubcommands::SetAvailablePageLayouts { names } => {
                commands::branding::set_available_page_layouts_command(&mut ctx, &names).await?;
            }
            BrandingSubcommands::ClearPageLayouts => {
                commands::branding::clear_page_layouts_command(&mut ctx).await?;
            }
            BrandingSubcommands::InheritPageLayouts => {
                commands::branding::inherit_page_layouts_command(&mut ctx).await?;
            }
            BrandingSubcommands::SetAvailableWebTemplates { entries } => {
                commands::branding::set_available_web_templates_command(&mut ctx, &entries)
                    .await?;
            }
            BrandingSubcommands::ClearWebTemplates => {
                commands::branding::clear_web_templates_command(&mut ctx).await?;
            }
        },
        Commands::Nav(nav) => match nav.command {
            NavSubcommands::Add {
                title,
                url,
                parent,
                top,
            } => {
                commands::navigation::add_command(&mut ctx, &title, &url, &parent, top).await?;
            }
            NavSubcommands::Remove { title, parent, top } => {
                commands::navigation::remove_command(&mut ctx, &title, &parent, top).await?;
            }
            NavSubcommands::Clear { force } => {
                commands::navigation::clear_command(&mut ctx, force).await?;
            }
            NavSubcommands::Inherit { enabled } => {
                commands::navigation::inherit_command(&mut ctx, enabled).await?;
            }
        },
        Commands::Taxonomy(taxonomy) => match taxonomy.command {
            TaxonomySubcommands::Import {
                terms,
                path,
                lcid,
                delimiter,
            } => {
                commands::taxonomy::import_command(
                    &mut ctx,
                    &terms,
                    path.as_deref(),
                    lcid,
                    &delimiter,
                )
                .await?;
            }
            TaxonomySubcommands::Get { term, delimiter } => {
                commands::taxonomy::get_command(&mut ctx, &term, &delimiter).await?;
            }
        },
        Commands::Features(features) => match features.command {
            FeatureSubcommands::List { scope } => {
                commands::features::list_command(&mut ctx, scope.into()).await?;
            }
            FeatureSubcommands::Activate { id, scope, force } => {
                commands::features::activate_command(&mut ctx, scope.into(), id, force).await?;
            }
            FeatureSubcommands::Deactivate { id, scope, force } => {
                commands::features::deactivate_command(&mut ctx, scope.into(), id, force).await?;
            }
            FeatureSubcommands::Sideloading { on } => {
                commands::features::sideloading_command(&mut ctx, on).await?;
            }
        },
        Commands::Propbag(propbag) => match propbag.command {
            PropBagSubcommands::Get { key } => {
                commands::propertybag::get_command(&mut ctx, &key).await?;
            }
            PropBagSubcommands::Set { key, value } => {
                commands::propertybag::set_command(&mut ctx, &key, &value).await?;
            }
        },
    }

    Ok(())
}
