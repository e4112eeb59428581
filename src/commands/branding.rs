//! Branding command handlers: thin glue from CLI arguments to ops calls.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::api::ClientContext;
use crate::ops::branding::{self, ThemeOption};
use crate::propbag::WebTemplateEntity;

pub async fn deploy_theme_command(ctx: &mut ClientContext, theme: &ThemeOption) -> Result<()> {
    let web = ctx.web();
    let root_web = ctx.root_web();
    branding::deploy_theme(ctx, web, root_web, theme).await?;
    println!("{} theme '{}' deployed", "✓".green(), theme.name);
    Ok(())
}

pub async fn set_theme_command(ctx: &mut ClientContext, name: &str) -> Result<()> {
    let web = ctx.web();
    let root_web = ctx.root_web();
    if branding::set_theme(ctx, web, root_web, name).await? {
        println!("{} theme '{}' applied", "✓".green(), name);
    } else {
        println!("{} no composite look entry named '{}'", "✗".red(), name);
    }
    Ok(())
}

pub async fn set_master_page_command(
    ctx: &mut ClientContext,
    name: &str,
    custom: bool,
) -> Result<()> {
    let web = ctx.web();
    if custom {
        branding::set_custom_master_page_by_name(ctx, web, name).await?;
    } else {
        branding::set_master_page_by_name(ctx, web, name).await?;
    }
    println!("{} master page set from '{}'", "✓".green(), name);
    Ok(())
}

pub async fn deploy_master_page_command(
    ctx: &mut ClientContext,
    path: &Path,
    title: &str,
    description: &str,
    ui_version: &str,
) -> Result<()> {
    let web = ctx.web();
    branding::deploy_master_page(ctx, web, path, title, description, ui_version).await?;
    println!("{} master page '{}' deployed", "✓".green(), title);
    Ok(())
}

pub async fn deploy_page_layout_command(
    ctx: &mut ClientContext,
    path: &Path,
    title: &str,
    description: &str,
    content_type_id: &str,
) -> Result<()> {
    let web = ctx.web();
    branding::deploy_page_layout(ctx, web, path, title, description, content_type_id).await?;
    println!("{} page layout '{}' deployed", "✓".green(), title);
    Ok(())
}

pub async fn set_site_logo_command(ctx: &mut ClientContext, path: &Path) -> Result<()> {
    let web = ctx.web();
    branding::set_site_logo(ctx, web, path).await?;
    println!("{} site logo updated", "✓".green());
    Ok(())
}

pub async fn set_default_page_layout_command(ctx: &mut ClientContext, name: &str) -> Result<()> {
    let web = ctx.web();
    let root_web = ctx.root_web();
    branding::set_default_page_layout(ctx, web, root_web, name).await?;
    println!("{} default page layout is now '{}'", "✓".green(), name);
    Ok(())
}

pub async fn set_available_page_layouts_command(
    ctx: &mut ClientContext,
    names: &[String],
) -> Result<()> {
    let web = ctx.web();
    let root_web = ctx.root_web();
    branding::set_available_page_layouts(ctx, web, root_web, names).await?;
    println!("{} {} page layout(s) made available", "✓".green(), names.len());
    Ok(())
}

pub async fn clear_page_layouts_command(ctx: &mut ClientContext) -> Result<()> {
    let web = ctx.web();
    branding::clear_available_page_layouts(ctx, web).await?;
    println!("{} page layout filter cleared", "✓".green());
    Ok(())
}

pub async fn inherit_page_layouts_command(ctx: &mut ClientContext) -> Result<()> {
    let web = ctx.web();
    branding::set_site_to_inherit_page_layouts(ctx, web).await?;
    println!("{} page layouts now inherited from parent", "✓".green());
    Ok(())
}

pub async fn set_available_web_templates_command(
    ctx: &mut ClientContext,
    entries: &[String],
) -> Result<()> {
    let templates: Vec<WebTemplateEntity> = entries.iter().map(|e| parse_template_entry(e)).collect();
    let web = ctx.web();
    branding::set_available_web_templates(ctx, web, &templates).await?;
    println!("{} {} web template(s) made available", "✓".green(), templates.len());
    Ok(())
}

pub async fn clear_web_templates_command(ctx: &mut ClientContext) -> Result<()> {
    let web = ctx.web();
    branding::clear_available_web_templates(ctx, web).await?;
    println!("{} web template filter cleared", "✓".green());
    Ok(())
}

/// Parse `lcid:name` into a template entity; a bare name applies to all
/// languages. Template names themselves may contain `#` but not `:`.
fn parse_template_entry(entry: &str) -> WebTemplateEntity {
    match entry.split_once(':') {
        Some((language, name)) => WebTemplateEntity {
            language_code: language.to_string(),
            template_name: name.to_string(),
        },
        None => WebTemplateEntity {
            language_code: String::new(),
            template_name: entry.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_entry() {
        let entry = parse_template_entry("1033:STS#0");
        assert_eq!(entry.language_code, "1033");
        assert_eq!(entry.template_name, "STS#0");

        let entry = parse_template_entry("BLANKINTERNET#0");
        assert_eq!(entry.language_code, "");
        assert_eq!(entry.template_name, "BLANKINTERNET#0");
    }
}
