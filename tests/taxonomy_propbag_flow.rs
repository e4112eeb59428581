//! Integration tests for term store imports and raw property bag access.

mod common;

use common::{ScriptedTransport, properties_response};
use serde_json::json;
use spo_cli::api::{Action, ClientContext, LocalInputFault};
use spo_cli::ops::{propertybag, taxonomy};

fn context_with(transport: ScriptedTransport) -> ClientContext {
    ClientContext::new("https://contoso.sharepoint.com/sites/intranet", Box::new(transport))
}

/// Each term path flushes one batch of ensure actions, group first.
#[tokio::test]
async fn test_import_terms_one_round_trip_per_line() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    let mut ctx = context_with(transport);

    let lines = vec![
        "Company|Locations|Stockholm".to_string(),
        "Company|Locations|Helsinki|Office".to_string(),
    ];
    let imported = taxonomy::import_terms(&mut ctx, &lines, 1033, "|").await.unwrap();
    assert_eq!(imported, 2);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[0][..],
        [
            Action::EnsureTermGroup { name: group, .. },
            Action::EnsureTermSet { name: set, lcid: 1033, .. },
            Action::EnsureTerm { name: term, lcid: 1033, .. },
        ] if group == "Company" && set == "Locations" && term == "Stockholm"
    ));
    assert_eq!(calls[1].len(), 4);
}

/// A term path with fewer than two segments is rejected locally.
#[tokio::test]
async fn test_import_rejects_short_term_path() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    let mut ctx = context_with(transport);

    let lines = vec!["Company".to_string()];
    assert!(taxonomy::import_terms(&mut ctx, &lines, 1033, "|").await.is_err());
    assert!(calls.lock().unwrap().is_empty());
}

/// Importing from a file that does not exist is a local input fault; the
/// transport is never touched.
#[tokio::test]
async fn test_import_from_missing_file_faults_locally() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    let mut ctx = context_with(transport);

    let missing = std::path::Path::new("/nonexistent/terms.txt");
    let err = taxonomy::import_terms_from_file(&mut ctx, missing, 1033, "|")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LocalInputFault>(),
        Some(LocalInputFault::MissingFile(_))
    ));
    assert!(calls.lock().unwrap().is_empty());
}

/// Resolving a term path loads Name and Id on the leaf handle.
#[tokio::test]
async fn test_get_taxonomy_item_loads_leaf() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(properties_response(common::props(&[
        ("Name", json!("Stockholm")),
        ("Id", json!("2c9e1d32-1fb5-4a62-8756-7a2a6e7f5e6f")),
    ])));
    let mut ctx = context_with(transport);

    let item = taxonomy::get_taxonomy_item_by_path(&mut ctx, "Company|Locations|Stockholm", "|")
        .await
        .unwrap();
    assert_eq!(ctx.string_prop(item, "Name").unwrap(), "Stockholm");
    assert_eq!(calls.lock().unwrap().len(), 1);
}

/// Reading a property bag key hydrates AllProperties once and answers later
/// reads from the loaded map.
#[tokio::test]
async fn test_property_bag_read_hydrates_once() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(properties_response(common::props(&[(
        "AllProperties",
        json!({"__DefaultPageLayout": "__inherit"}),
    )])));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let value = propertybag::get_property_bag_value(&mut ctx, web, "__DefaultPageLayout")
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("__inherit"));

    let missing = propertybag::get_property_bag_value(&mut ctx, web, "__Absent")
        .await
        .unwrap();
    assert_eq!(missing, None);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

/// Writing a property bag key stages the value and commits the web.
#[tokio::test]
async fn test_property_bag_write_commits() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    let mut ctx = context_with(transport);

    let web = ctx.web();
    propertybag::set_property_bag_value(&mut ctx, web, "__PageLayouts", "")
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(matches!(
        &calls[0][..],
        [
            Action::SetPropertyBag { key, value, .. },
            Action::Update { .. },
        ] if key == "__PageLayouts" && value.is_empty()
    ));
}
