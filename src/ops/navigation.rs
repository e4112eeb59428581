//! Navigation tree edits: quick launch, top navigation bar and user custom
//! actions.

use anyhow::Result;
use log::{debug, warn};

use crate::api::{ClientContext, FieldValue, NavigationKind, NavigationNodeCreation, ObjectId};

/// A custom action to add to (or remove from) a web.
#[derive(Debug, Clone, Default)]
pub struct CustomActionEntity {
    pub title: String,
    pub description: String,
    pub group: String,
    pub location: String,
    pub sequence: i64,
    pub url: String,
    pub image_url: String,
    pub script_block: String,
    /// When set, only remove the matching existing action.
    pub remove: bool,
}

/// Location value whose actions carry a script block instead of a link.
pub const SCRIPT_LOCATION: &str = "ScriptLink";

/// Add a node to the quick launch or the top navigation bar. With a parent
/// title, the node is added under the first quick launch node with that
/// title; an unmatched parent adds nothing.
pub async fn add_navigation_node(
    ctx: &mut ClientContext,
    web: ObjectId,
    node_title: &str,
    node_url: &str,
    parent_node_title: &str,
    quick_launch: bool,
) -> Result<()> {
    let (quick, top) = load_navigation(ctx, web).await?;

    let node = NavigationNodeCreation {
        title: node_title.to_string(),
        url: node_url.to_string(),
        as_last_node: true,
    };

    if quick_launch {
        if parent_node_title.is_empty() {
            ctx.add_navigation_node(quick, node);
        } else {
            match find_node_by_title(ctx, quick, parent_node_title)? {
                Some(parent) => {
                    let children = ctx.navigation_children(parent);
                    ctx.add_navigation_node(children, node);
                }
                None => {
                    warn!(
                        "no quick launch node titled '{}', nothing added",
                        parent_node_title
                    );
                    return Ok(());
                }
            }
        }
    } else {
        ctx.add_navigation_node(top, node);
    }
    ctx.execute_query().await?;
    Ok(())
}

/// Delete a node by title from the quick launch or top navigation bar,
/// optionally under a parent node. A title that matches nothing is a no-op.
pub async fn delete_navigation_node(
    ctx: &mut ClientContext,
    web: ObjectId,
    node_title: &str,
    parent_node_title: &str,
    quick_launch: bool,
) -> Result<()> {
    let (quick, top) = load_navigation(ctx, web).await?;

    let collection = if quick_launch {
        if parent_node_title.is_empty() {
            quick
        } else {
            let Some(parent) = find_node_by_title(ctx, quick, parent_node_title)? else {
                debug!("parent node '{}' not found", parent_node_title);
                return Ok(());
            };
            let children = ctx.navigation_children(parent);
            ctx.load_collection(children);
            ctx.execute_query().await?;
            children
        }
    } else {
        top
    };

    if let Some(node) = find_node_by_title(ctx, collection, node_title)? {
        ctx.delete_object(node);
        ctx.execute_query().await?;
    } else {
        debug!("navigation node '{}' not found", node_title);
    }
    Ok(())
}

/// Delete every quick launch node, in reverse order, in one round trip.
pub async fn delete_all_quick_launch_nodes(ctx: &mut ClientContext, web: ObjectId) -> Result<()> {
    let quick = ctx.navigation(web, NavigationKind::QuickLaunch);
    ctx.load_collection(quick);
    ctx.execute_query().await?;

    for node in ctx.items(quick)?.into_iter().rev() {
        ctx.delete_object(node);
    }
    ctx.execute_query().await?;
    Ok(())
}

/// Switch navigation inheritance from the parent web on or off.
pub async fn update_navigation_inheritance(
    ctx: &mut ClientContext,
    web: ObjectId,
    inherit_navigation: bool,
) -> Result<()> {
    ctx.stage(
        web,
        "Navigation.UseShared",
        FieldValue::Bool(inherit_navigation),
    );
    ctx.update(web);
    ctx.execute_query().await?;
    Ok(())
}

/// Add a custom action to the web, first deleting any existing action with
/// the same description and location. Returns `false` when the entity only
/// asked for removal.
pub async fn add_custom_action(
    ctx: &mut ClientContext,
    web: ObjectId,
    custom_action: &CustomActionEntity,
) -> Result<bool> {
    let existing = ctx.user_custom_actions(web);
    ctx.load_collection(existing);
    ctx.execute_query().await?;

    for action in ctx.items(existing)? {
        let description = ctx.opt_string_prop(action, "Description")?.unwrap_or_default();
        let location = ctx.opt_string_prop(action, "Location")?.unwrap_or_default();
        if description == custom_action.description && location == custom_action.location {
            ctx.delete_object(action);
            ctx.execute_query().await?;
        }
    }

    if custom_action.remove {
        return Ok(false);
    }

    let action = ctx.add_custom_action(existing);
    ctx.stage(
        action,
        "Description",
        FieldValue::Text(custom_action.description.clone()),
    );
    ctx.stage(
        action,
        "Location",
        FieldValue::Text(custom_action.location.clone()),
    );
    if custom_action.location == SCRIPT_LOCATION {
        ctx.stage(
            action,
            "ScriptBlock",
            FieldValue::Text(custom_action.script_block.clone()),
        );
    } else {
        ctx.stage(action, "Sequence", FieldValue::Number(custom_action.sequence));
        ctx.stage(action, "Url", FieldValue::Url(custom_action.url.clone()));
        ctx.stage(action, "Group", FieldValue::Text(custom_action.group.clone()));
        ctx.stage(action, "Title", FieldValue::Text(custom_action.title.clone()));
        ctx.stage(
            action,
            "ImageUrl",
            FieldValue::Url(custom_action.image_url.clone()),
        );
    }
    ctx.update(action);
    ctx.execute_query().await?;
    Ok(true)
}

async fn load_navigation(
    ctx: &mut ClientContext,
    web: ObjectId,
) -> Result<(ObjectId, ObjectId)> {
    let quick = ctx.navigation(web, NavigationKind::QuickLaunch);
    let top = ctx.navigation(web, NavigationKind::TopNavigationBar);
    ctx.load_collection(quick);
    ctx.load_collection(top);
    ctx.execute_query().await?;
    Ok((quick, top))
}

fn find_node_by_title(
    ctx: &ClientContext,
    collection: ObjectId,
    title: &str,
) -> Result<Option<ObjectId>> {
    for node in ctx.items(collection)? {
        if ctx.opt_string_prop(node, "Title")?.as_deref() == Some(title) {
            return Ok(Some(node));
        }
    }
    Ok(None)
}
