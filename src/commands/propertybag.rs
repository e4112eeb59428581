//! Property bag command handlers.

use anyhow::Result;
use colored::Colorize;

use crate::api::ClientContext;
use crate::ops::propertybag;

pub async fn get_command(ctx: &mut ClientContext, key: &str) -> Result<()> {
    let web = ctx.web();
    match propertybag::get_property_bag_value(ctx, web, key).await? {
        Some(value) => println!("{}", value),
        None => println!("{} key '{}' is not set", "✗".red(), key),
    }
    Ok(())
}

pub async fn set_command(ctx: &mut ClientContext, key: &str, value: &str) -> Result<()> {
    let web = ctx.web();
    propertybag::set_property_bag_value(ctx, web, key, value).await?;
    println!("{} '{}' set", "✓".green(), key);
    Ok(())
}
