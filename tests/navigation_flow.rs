//! Integration tests for quick launch and top navigation edits.

mod common;

use common::{ScriptedTransport, string_props};
use serde_json::json;
use spo_cli::api::{Action, ActionResult, BatchResponse, ClientContext};
use spo_cli::ops::navigation::{self, CustomActionEntity};

fn context_with(transport: ScriptedTransport) -> ClientContext {
    ClientContext::new("https://contoso.sharepoint.com/sites/intranet", Box::new(transport))
}

fn navigation_collections(quick: Vec<(&str, i64)>, top: Vec<(&str, i64)>) -> BatchResponse {
    let to_items = |nodes: Vec<(&str, i64)>| {
        nodes
            .into_iter()
            .map(|(title, id)| common::props(&[("Title", json!(title)), ("Id", json!(id))]))
            .collect()
    };
    BatchResponse::new(vec![
        ActionResult::Items(to_items(quick)),
        ActionResult::Items(to_items(top)),
    ])
}

/// A top-level quick launch node goes straight onto the collection.
#[tokio::test]
async fn test_add_quick_launch_node() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(navigation_collections(vec![], vec![]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    navigation::add_navigation_node(&mut ctx, web, "Departments", "/departments", "", true)
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[1][0],
        Action::AddNavigationNode { node, .. }
            if node.title == "Departments" && node.url == "/departments" && node.as_last_node
    ));
}

/// An unmatched parent title adds nothing and issues no second round trip.
#[tokio::test]
async fn test_add_node_under_missing_parent_is_a_noop() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(navigation_collections(vec![("Home", 1)], vec![]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    navigation::add_navigation_node(&mut ctx, web, "Child", "/child", "Nonexistent", true)
        .await
        .unwrap();

    assert_eq!(calls.lock().unwrap().len(), 1);
}

/// Deleting a node by title sends one DeleteObject for the match.
#[tokio::test]
async fn test_delete_navigation_node_by_title() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(navigation_collections(
        vec![("Home", 1), ("Departments", 2)],
        vec![],
    ));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    navigation::delete_navigation_node(&mut ctx, web, "Departments", "", true)
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].len(), 1);
    assert!(matches!(&calls[1][0], Action::DeleteObject { .. }));
}

/// Clearing the quick launch deletes every node in reverse order, in one
/// round trip.
#[tokio::test]
async fn test_clear_quick_launch_deletes_in_reverse() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(BatchResponse::new(vec![ActionResult::Items(vec![
        string_props(&[("Title", "First")]),
        string_props(&[("Title", "Second")]),
        string_props(&[("Title", "Third")]),
    ])]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    navigation::delete_all_quick_launch_nodes(&mut ctx, web).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    let deletions: Vec<_> = calls[1]
        .iter()
        .filter(|action| matches!(action, Action::DeleteObject { .. }))
        .collect();
    assert_eq!(deletions.len(), 3);
}

/// Adding a custom action deletes any existing action with the same
/// description and location first.
#[tokio::test]
async fn test_add_custom_action_replaces_matching_existing() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(BatchResponse::new(vec![ActionResult::Items(vec![
        common::props(&[
            ("Id", json!("a1")),
            ("Description", json!("branding script")),
            ("Location", json!("ScriptLink")),
        ]),
    ])]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let entity = CustomActionEntity {
        description: "branding script".to_string(),
        location: "ScriptLink".to_string(),
        script_block: "console.log('hi');".to_string(),
        ..Default::default()
    };
    let added = navigation::add_custom_action(&mut ctx, web, &entity).await.unwrap();
    assert!(added);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[1][0], Action::DeleteObject { .. }));
    assert!(matches!(&calls[2][0], Action::AddCustomAction { .. }));
    // script locations carry a script block, not a link
    assert!(calls[2].iter().any(|action| matches!(
        action,
        Action::SetField { field, .. } if field == "ScriptBlock"
    )));
    assert!(calls[2].iter().all(|action| !matches!(
        action,
        Action::SetField { field, .. } if field == "Url"
    )));
}

/// A remove-only entity deletes and reports that nothing was added.
#[tokio::test]
async fn test_remove_only_custom_action() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(BatchResponse::new(vec![ActionResult::Items(vec![])]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let entity = CustomActionEntity {
        description: "gone".to_string(),
        location: "ScriptLink".to_string(),
        remove: true,
        ..Default::default()
    };
    let added = navigation::add_custom_action(&mut ctx, web, &entity).await.unwrap();
    assert!(!added);
    assert_eq!(calls.lock().unwrap().len(), 1);
}
