//! Taxonomy command handlers.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::api::ClientContext;
use crate::ops::taxonomy;

pub async fn import_command(
    ctx: &mut ClientContext,
    terms: &[String],
    path: Option<&Path>,
    lcid: u32,
    delimiter: &str,
) -> Result<()> {
    let imported = match path {
        Some(path) => taxonomy::import_terms_from_file(ctx, path, lcid, delimiter).await?,
        None => taxonomy::import_terms(ctx, terms, lcid, delimiter).await?,
    };
    println!("{} {} term path(s) imported", "✓".green(), imported);
    Ok(())
}

pub async fn get_command(ctx: &mut ClientContext, term: &str, delimiter: &str) -> Result<()> {
    let item = taxonomy::get_taxonomy_item_by_path(ctx, term, delimiter).await?;
    let name = ctx.string_prop(item, "Name")?;
    let id = ctx.string_prop(item, "Id")?;
    println!("{} {}", name.bold(), id.dimmed());
    Ok(())
}
