//! Feature command handlers.

use anyhow::Result;
use colored::Colorize;
use uuid::Uuid;

use crate::api::{ClientContext, FeatureScope};
use crate::ops::features;

pub async fn list_command(ctx: &mut ClientContext, scope: FeatureScope) -> Result<()> {
    let infos = features::get_features(ctx, scope).await?;
    if infos.is_empty() {
        println!("No features activated at {} scope.", scope);
        return Ok(());
    }
    for info in infos {
        println!("{} {}", info.definition_id, info.display_name.bold());
    }
    Ok(())
}

pub async fn activate_command(
    ctx: &mut ClientContext,
    scope: FeatureScope,
    id: Uuid,
    force: bool,
) -> Result<()> {
    features::activate_feature(ctx, scope, id, force).await?;
    println!("{} feature {} activated at {} scope", "✓".green(), id, scope);
    Ok(())
}

pub async fn deactivate_command(
    ctx: &mut ClientContext,
    scope: FeatureScope,
    id: Uuid,
    force: bool,
) -> Result<()> {
    features::deactivate_feature(ctx, scope, id, force).await?;
    println!("{} feature {} deactivated at {} scope", "✓".green(), id, scope);
    Ok(())
}

pub async fn sideloading_command(ctx: &mut ClientContext, on: bool) -> Result<()> {
    features::set_app_sideloading(ctx, on).await?;
    println!(
        "{} app side-loading {}",
        "✓".green(),
        if on { "enabled" } else { "disabled" }
    );
    Ok(())
}
