//! Navigation command handlers.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use crate::api::ClientContext;
use crate::ops::navigation;

pub async fn add_command(
    ctx: &mut ClientContext,
    title: &str,
    url: &str,
    parent: &str,
    top: bool,
) -> Result<()> {
    let web = ctx.web();
    navigation::add_navigation_node(ctx, web, title, url, parent, !top).await?;
    println!("{} navigation node '{}' added", "✓".green(), title);
    Ok(())
}

pub async fn remove_command(
    ctx: &mut ClientContext,
    title: &str,
    parent: &str,
    top: bool,
) -> Result<()> {
    let web = ctx.web();
    navigation::delete_navigation_node(ctx, web, title, parent, !top).await?;
    println!("{} navigation node '{}' removed", "✓".green(), title);
    Ok(())
}

pub async fn clear_command(ctx: &mut ClientContext, force: bool) -> Result<()> {
    if !force
        && !Confirm::new()
            .with_prompt("Delete every quick launch node?")
            .default(false)
            .interact()?
    {
        println!("aborted");
        return Ok(());
    }
    let web = ctx.web();
    navigation::delete_all_quick_launch_nodes(ctx, web).await?;
    println!("{} quick launch cleared", "✓".green());
    Ok(())
}

pub async fn inherit_command(ctx: &mut ClientContext, enabled: bool) -> Result<()> {
    let web = ctx.web();
    navigation::update_navigation_inheritance(ctx, web, enabled).await?;
    println!(
        "{} navigation inheritance {}",
        "✓".green(),
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
