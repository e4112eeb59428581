//! Branding operations: theme deployment and selection, master pages, page
//! layouts and web template filters.
//!
//! Every function takes the context by reference and follows the same
//! discipline: resolve, ensure loaded, stage, flush.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::api::constants::{self, catalogs, content_types};
use crate::api::{ClientContext, FieldValue, FileCreation, LocalInputFault, ObjectId};
use crate::caml::CamlQuery;
use crate::propbag::{self, PageLayoutRef, WebTemplateEntity, keys};
use crate::urlutil;

use super::propertybag::set_property_bag_value;

/// A composite look entry to deploy. Optional file paths that do not exist
/// locally are skipped, not errors.
#[derive(Debug, Clone, Default)]
pub struct ThemeOption {
    pub name: String,
    pub color_file: Option<PathBuf>,
    pub font_file: Option<PathBuf>,
    pub background_image: Option<PathBuf>,
    /// Name only, no catalog path. Defaults to `seattle.master` when unset.
    pub master_page: Option<String>,
}

/// Deploy theme files to the root web's theme catalog and register a
/// composite look entry on the given web.
pub async fn deploy_theme(
    ctx: &mut ClientContext,
    web: ObjectId,
    root_web: ObjectId,
    theme: &ThemeOption,
) -> Result<()> {
    info!("Deploying theme '{}' to '{}'", theme.name, ctx.site_url());

    for file in [&theme.color_file, &theme.font_file, &theme.background_image]
        .into_iter()
        .flatten()
    {
        if file.exists() {
            deploy_file_to_theme_folder(ctx, root_web, file).await?;
        } else {
            debug!("skipping missing theme file {}", file.display());
        }
    }

    add_theme_option(ctx, web, root_web, theme).await
}

/// Check whether a composite look entry with this exact name exists.
/// Name comparison is a case-sensitive match on the `Name` field.
pub async fn theme_entry_exists(
    ctx: &mut ClientContext,
    themes_list: ObjectId,
    theme_name: &str,
) -> Result<bool> {
    let found = ctx.query_items(themes_list, &CamlQuery::eq("Name", theme_name));
    ctx.execute_query().await?;
    Ok(ctx.item_count(found)? > 0)
}

/// Add a composite look entry unless one with the same name already exists.
/// The existence check short-circuits the creation entirely.
pub async fn add_theme_option(
    ctx: &mut ClientContext,
    web: ObjectId,
    root_web: ObjectId,
    theme: &ThemeOption,
) -> Result<()> {
    let themes_list = ctx.catalog(web, catalogs::COMPOSITE_LOOKS);
    if theme_entry_exists(ctx, themes_list, &theme.name).await? {
        info!("Theme entry '{}' already exists, not re-adding", theme.name);
        return Ok(());
    }

    ctx.ensure_loaded(root_web, "ServerRelativeUrl").await?;
    ctx.ensure_loaded(web, "ServerRelativeUrl").await?;
    let root_url = ctx.string_prop(root_web, "ServerRelativeUrl")?;
    let web_url = ctx.string_prop(web, "ServerRelativeUrl")?;

    let item = ctx.create_item(themes_list);
    ctx.stage(item, "Name", FieldValue::Text(theme.name.clone()));
    ctx.stage(item, "Title", FieldValue::Text(theme.name.clone()));

    for (field, file) in [
        ("ThemeUrl", &theme.color_file),
        ("FontSchemeUrl", &theme.font_file),
        ("ImageUrl", &theme.background_image),
    ] {
        if let Some(file) = file {
            if file.exists() {
                let url = urlutil::combine(
                    &root_url,
                    &format!(
                        "/_catalogs/theme/{}/{}",
                        constants::THEME_FOLDER_VERSION,
                        urlutil::file_name(file)
                    ),
                );
                ctx.stage(item, field, FieldValue::Url(url));
            }
        }
    }

    // seattle master is used if nothing else is set
    let master_name = theme
        .master_page
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(constants::DEFAULT_MASTER_PAGE);
    let master_url = urlutil::combine(
        &web_url,
        &format!("/_catalogs/masterpage/{}", master_name),
    );
    ctx.stage(item, "MasterPageUrl", FieldValue::Url(master_url));
    ctx.stage(
        item,
        "DisplayOrder",
        FieldValue::Number(constants::THEME_DISPLAY_ORDER),
    );
    ctx.update(item);
    ctx.execute_query().await?;
    Ok(())
}

/// Apply an existing composite look to a web. Returns `false` when no entry
/// with the given name exists (nothing is changed in that case).
pub async fn set_theme(
    ctx: &mut ClientContext,
    web: ObjectId,
    root_web: ObjectId,
    theme_name: &str,
) -> Result<bool> {
    info!("Setting theme '{}' for '{}'", theme_name, ctx.site_url());

    let theme_list = ctx.catalog(root_web, catalogs::COMPOSITE_LOOKS);
    let found = ctx.query_items(theme_list, &CamlQuery::eq("Name", theme_name));
    ctx.execute_query().await?;

    let Some(entry) = ctx.items(found)?.first().copied() else {
        warn!("No composite look entry named '{}'", theme_name);
        return Ok(false);
    };

    let color_url = ctx
        .opt_url_prop(entry, "ThemeUrl")?
        .map(|url| urlutil::make_relative(&url));
    let font_url = ctx
        .opt_url_prop(entry, "FontSchemeUrl")?
        .map(|url| urlutil::make_relative(&url));
    let background_url = ctx
        .opt_url_prop(entry, "ImageUrl")?
        .map(|url| urlutil::make_relative(&url));

    debug!(
        "Apply theme '{:?}', '{:?}', '{:?}'",
        color_url, font_url, background_url
    );
    ctx.apply_theme(web, color_url, font_url, background_url, false);

    if let Some(master_url) = ctx.opt_url_prop(entry, "MasterPageUrl")? {
        let master_url = urlutil::make_relative(&master_url);
        debug!("Set masterpage '{}'", master_url);
        ctx.stage(web, "MasterUrl", FieldValue::Url(master_url));
        ctx.update(web);
    }

    ctx.execute_query().await?;
    Ok(true)
}

/// Upload a local file into the theme files catalog's version folder.
pub async fn deploy_file_to_theme_folder(
    ctx: &mut ClientContext,
    web: ObjectId,
    source: &Path,
) -> Result<ObjectId> {
    if !source.exists() {
        return Err(LocalInputFault::MissingFile(source.to_path_buf()).into());
    }
    let content = std::fs::read(source)?;
    deploy_bytes_to_theme_folder(ctx, web, content, &urlutil::file_name(source)).await
}

pub async fn deploy_bytes_to_theme_folder(
    ctx: &mut ClientContext,
    web: ObjectId,
    content: Vec<u8>,
    file_name: &str,
) -> Result<ObjectId> {
    debug!(
        "Deploying file '{}' to '{}' theme folder '{}'",
        file_name,
        ctx.site_url(),
        constants::THEME_FOLDER_VERSION
    );

    let themes_list = ctx.catalog(web, catalogs::THEME_FILES);
    let root_folder = ctx.root_folder(themes_list);
    let version_folder = ctx.sub_folder(root_folder, constants::THEME_FOLDER_VERSION);
    ctx.ensure_loaded(version_folder, "ServerRelativeUrl").await?;
    let folder_url = ctx.string_prop(version_folder, "ServerRelativeUrl")?;

    let file = ctx.add_file(
        version_folder,
        FileCreation {
            url: urlutil::combine(&folder_url, file_name),
            content,
            overwrite: true,
        },
    );
    ctx.execute_query().await?;
    Ok(file)
}

/// Upload a master page to the master page gallery and fill in its metadata.
pub async fn deploy_master_page(
    ctx: &mut ClientContext,
    web: ObjectId,
    source: &Path,
    title: &str,
    description: &str,
    ui_version: &str,
) -> Result<()> {
    let (gallery, file) = upload_to_master_page_gallery(ctx, web, source).await?;
    let gated = checkout_gated(ctx, gallery)?;
    if gated {
        check_out_if_needed(ctx, file).await?;
    }

    let item = ctx.file_list_item(file);
    ctx.stage(item, "Title", FieldValue::Text(title.to_string()));
    ctx.stage(
        item,
        "MasterPageDescription",
        FieldValue::Text(description.to_string()),
    );
    ctx.stage(
        item,
        "ContentTypeId",
        FieldValue::Text(content_types::MASTER_PAGE.to_string()),
    );
    ctx.stage(item, "UIVersion", FieldValue::Text(ui_version.to_string()));
    ctx.update(item);
    if gated {
        ctx.check_in(file, "", true);
        ctx.publish(file, "");
    }
    ctx.execute_query().await?;
    Ok(())
}

/// Upload a page layout to the master page gallery and associate it with a
/// content type.
pub async fn deploy_page_layout(
    ctx: &mut ClientContext,
    web: ObjectId,
    source: &Path,
    title: &str,
    description: &str,
    associated_content_type_id: &str,
) -> Result<()> {
    let (gallery, file) = upload_to_master_page_gallery(ctx, web, source).await?;
    let gated = checkout_gated(ctx, gallery)?;
    if gated {
        check_out_if_needed(ctx, file).await?;
    }

    let content_type = ctx.content_type_by_id(web, associated_content_type_id);
    ctx.ensure_loaded(content_type, "Name").await?;
    let content_type_name = ctx.string_prop(content_type, "Name")?;

    let item = ctx.file_list_item(file);
    ctx.stage(item, "Title", FieldValue::Text(title.to_string()));
    ctx.stage(
        item,
        "MasterPageDescription",
        FieldValue::Text(description.to_string()),
    );
    ctx.stage(
        item,
        "ContentTypeId",
        FieldValue::Text(content_types::PAGE_LAYOUT.to_string()),
    );
    ctx.stage(
        item,
        "PublishingAssociatedContentType",
        FieldValue::Text(format!(
            ";#{};#{};#",
            content_type_name, associated_content_type_id
        )),
    );
    ctx.stage(item, "UIVersion", FieldValue::Text("15".to_string()));
    ctx.update(item);
    if gated {
        ctx.check_in(file, "", true);
        ctx.publish(file, "");
    }
    ctx.execute_query().await?;
    Ok(())
}

async fn upload_to_master_page_gallery(
    ctx: &mut ClientContext,
    web: ObjectId,
    source: &Path,
) -> Result<(ObjectId, ObjectId)> {
    if !source.exists() {
        return Err(LocalInputFault::MissingFile(source.to_path_buf()).into());
    }
    let content = std::fs::read(source)?;

    let gallery = ctx.catalog(web, catalogs::MASTER_PAGE_GALLERY);
    let root_folder = ctx.root_folder(gallery);
    ctx.load(gallery, &["ForceCheckout", "EnableVersioning"]);
    ctx.load(root_folder, &["ServerRelativeUrl"]);
    ctx.execute_query().await?;

    let folder_url = ctx.string_prop(root_folder, "ServerRelativeUrl")?;
    let file = ctx.add_file(
        root_folder,
        FileCreation {
            url: urlutil::combine(&folder_url, &urlutil::file_name(source)),
            content,
            overwrite: true,
        },
    );
    ctx.execute_query().await?;
    Ok((gallery, file))
}

fn checkout_gated(ctx: &ClientContext, gallery: ObjectId) -> Result<bool> {
    Ok(ctx.bool_prop(gallery, "ForceCheckout")? || ctx.bool_prop(gallery, "EnableVersioning")?)
}

async fn check_out_if_needed(ctx: &mut ClientContext, file: ObjectId) -> Result<()> {
    ctx.ensure_loaded(file, "CheckOutType").await?;
    if ctx.string_prop(file, "CheckOutType")? == "None" {
        ctx.check_out(file);
    }
    Ok(())
}

/// Set both the master page and the custom master page by name.
pub async fn set_master_pages(
    ctx: &mut ClientContext,
    web: ObjectId,
    master_page_name: &str,
    custom_master_page_name: &str,
) -> Result<()> {
    set_master_page_by_name(ctx, web, master_page_name).await?;
    set_custom_master_page_by_name(ctx, web, custom_master_page_name).await?;
    Ok(())
}

/// Resolve a master page URL from its file name and set it as the web's
/// master page. No-op when the name resolves to nothing.
pub async fn set_master_page_by_name(
    ctx: &mut ClientContext,
    web: ObjectId,
    master_page_name: &str,
) -> Result<()> {
    if let Some(url) = relative_url_for_master_by_name(ctx, web, master_page_name).await? {
        set_master_page_by_url(ctx, web, &url).await?;
    }
    Ok(())
}

pub async fn set_custom_master_page_by_name(
    ctx: &mut ClientContext,
    web: ObjectId,
    master_page_name: &str,
) -> Result<()> {
    if let Some(url) = relative_url_for_master_by_name(ctx, web, master_page_name).await? {
        set_custom_master_page_by_url(ctx, web, &url).await?;
    }
    Ok(())
}

/// Find a master page in the gallery whose `FileRef` contains the given name
/// (case-insensitive substring). Returns the lowercased URL.
pub async fn relative_url_for_master_by_name(
    ctx: &mut ClientContext,
    web: ObjectId,
    master_page_name: &str,
) -> Result<Option<String>> {
    let gallery = ctx.catalog(web, catalogs::MASTER_PAGE_GALLERY);
    let found = ctx.query_items(gallery, &CamlQuery::contains("FileRef", ".master"));
    ctx.execute_query().await?;

    let needle = master_page_name.to_lowercase();
    for item in ctx.items(found)? {
        if let Some(file_ref) = ctx.opt_string_prop(item, "FileRef")? {
            let file_ref = file_ref.to_lowercase();
            if file_ref.contains(&needle) {
                return Ok(Some(file_ref));
            }
        }
    }
    Ok(None)
}

/// Find the gallery item of a page layout by name (case-insensitive
/// substring over `FileRef`, prefiltered to `.aspx`).
pub async fn page_layout_item_by_name(
    ctx: &mut ClientContext,
    web: ObjectId,
    page_layout_name: &str,
) -> Result<Option<ObjectId>> {
    let gallery = ctx.catalog(web, catalogs::MASTER_PAGE_GALLERY);
    let found = ctx.query_items(gallery, &CamlQuery::contains("FileRef", ".aspx"));
    ctx.execute_query().await?;

    let needle = page_layout_name.to_lowercase();
    for item in ctx.items(found)? {
        if let Some(file_ref) = ctx.opt_string_prop(item, "FileRef")? {
            if file_ref.to_lowercase().contains(&needle) {
                return Ok(Some(item));
            }
        }
    }
    Ok(None)
}

pub async fn set_master_page_by_url(
    ctx: &mut ClientContext,
    web: ObjectId,
    master_page_url: &str,
) -> Result<()> {
    ctx.stage(web, "MasterUrl", FieldValue::Url(master_page_url.to_string()));
    ctx.update(web);
    ctx.execute_query().await?;
    Ok(())
}

pub async fn set_custom_master_page_by_url(
    ctx: &mut ClientContext,
    web: ObjectId,
    master_page_url: &str,
) -> Result<()> {
    ctx.stage(
        web,
        "CustomMasterUrl",
        FieldValue::Url(master_page_url.to_string()),
    );
    ctx.update(web);
    ctx.execute_query().await?;
    Ok(())
}

/// Make the given page layout the default for the web, recorded in the
/// property bag.
pub async fn set_default_page_layout(
    ctx: &mut ClientContext,
    web: ObjectId,
    root_web: ObjectId,
    page_layout_name: &str,
) -> Result<()> {
    let layout = page_layout_ref(ctx, root_web, page_layout_name).await?;
    set_property_bag_value(
        ctx,
        web,
        keys::DEFAULT_PAGE_LAYOUT,
        &propbag::encode_default_page_layout(&layout),
    )
    .await
}

/// Restrict the layouts offered when creating pages on this web.
pub async fn set_available_page_layouts(
    ctx: &mut ClientContext,
    web: ObjectId,
    root_web: ObjectId,
    page_layout_names: &[String],
) -> Result<()> {
    let mut layouts = Vec::with_capacity(page_layout_names.len());
    for name in page_layout_names {
        layouts.push(page_layout_ref(ctx, root_web, name).await?);
    }
    set_property_bag_value(
        ctx,
        web,
        keys::AVAILABLE_PAGE_LAYOUTS,
        &propbag::encode_page_layouts(&layouts),
    )
    .await
}

async fn page_layout_ref(
    ctx: &mut ClientContext,
    root_web: ObjectId,
    page_layout_name: &str,
) -> Result<PageLayoutRef> {
    let Some(item) = page_layout_item_by_name(ctx, root_web, page_layout_name).await? else {
        anyhow::bail!("page layout '{}' not found in gallery", page_layout_name);
    };
    let unique_id = ctx.string_prop(item, "UniqueId")?;
    let file_ref = ctx.string_prop(item, "FileRef")?;
    Ok(PageLayoutRef {
        unique_id: Uuid::parse_str(&unique_id)?,
        url: solve_site_relative_url(ctx, root_web, &file_ref).await?,
    })
}

async fn solve_site_relative_url(
    ctx: &mut ClientContext,
    web: ObjectId,
    url: &str,
) -> Result<String> {
    ctx.ensure_loaded(web, "ServerRelativeUrl").await?;
    let web_url = ctx.string_prop(web, "ServerRelativeUrl")?;
    let relative = url.strip_prefix(&web_url).unwrap_or(url);
    Ok(relative.trim_start_matches('/').to_string())
}

/// Restrict the web templates offered when creating sub sites.
pub async fn set_available_web_templates(
    ctx: &mut ClientContext,
    web: ObjectId,
    templates: &[WebTemplateEntity],
) -> Result<()> {
    set_property_bag_value(
        ctx,
        web,
        keys::AVAILABLE_WEB_TEMPLATES,
        &propbag::encode_web_templates(templates),
    )
    .await?;
    set_property_bag_value(ctx, web, keys::INHERIT_WEB_TEMPLATES, "False").await
}

pub async fn clear_available_page_layouts(ctx: &mut ClientContext, web: ObjectId) -> Result<()> {
    set_property_bag_value(ctx, web, keys::AVAILABLE_PAGE_LAYOUTS, "").await
}

pub async fn clear_available_web_templates(ctx: &mut ClientContext, web: ObjectId) -> Result<()> {
    set_property_bag_value(ctx, web, keys::AVAILABLE_WEB_TEMPLATES, "").await
}

/// Inherit the default page layout from the parent web. Not valid on the
/// root web of a site collection.
pub async fn set_site_to_inherit_page_layouts(
    ctx: &mut ClientContext,
    web: ObjectId,
) -> Result<()> {
    set_property_bag_value(
        ctx,
        web,
        keys::DEFAULT_PAGE_LAYOUT,
        propbag::INHERIT_SENTINEL,
    )
    .await
}

/// Overwrite the themed site icon. Skips silently when the local file does
/// not exist.
pub async fn set_site_logo(ctx: &mut ClientContext, web: ObjectId, logo: &Path) -> Result<()> {
    if !logo.exists() {
        debug!("site logo '{}' not found locally, skipping", logo.display());
        return Ok(());
    }
    let content = std::fs::read(logo)?;

    // the themed icon lives under _themes/0 once a theme has been applied
    let root_folder = ctx.web_root_folder(web);
    let themes_folder = ctx.sub_folder(root_folder, "_themes");
    let assets_folder = ctx.sub_folder(themes_folder, "0");
    ctx.ensure_loaded(assets_folder, "ServerRelativeUrl").await?;
    let folder_url = ctx.string_prop(assets_folder, "ServerRelativeUrl")?;

    ctx.add_file(
        assets_folder,
        FileCreation {
            url: urlutil::combine(&folder_url, constants::THEMED_SITE_ICON),
            content,
            overwrite: true,
        },
    );
    ctx.execute_query().await?;
    Ok(())
}
