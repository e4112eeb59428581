//! Integration tests for composite look deployment and theme selection.

mod common;

use common::{ScriptedTransport, items_response, properties_response, string_props};
use serde_json::json;
use spo_cli::api::{Action, ActionResult, BatchResponse, ClientContext, FieldValue};
use spo_cli::ops::branding::{self, ThemeOption};

fn context_with(transport: ScriptedTransport) -> ClientContext {
    ClientContext::new("https://contoso.sharepoint.com/sites/intranet", Box::new(transport))
}

/// An existing composite look entry short-circuits the whole creation; no
/// item is created and only the existence query goes out.
#[tokio::test]
async fn test_existing_theme_entry_short_circuits() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(items_response(vec![string_props(&[("Name", "Contoso")])]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let root_web = ctx.root_web();
    let theme = ThemeOption {
        name: "Contoso".to_string(),
        ..Default::default()
    };
    branding::add_theme_option(&mut ctx, web, root_web, &theme).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(
        calls
            .iter()
            .flatten()
            .all(|action| !matches!(action, Action::CreateItem { .. }))
    );
}

/// Without an existing entry, the composite look item is created with the
/// default master page and display order.
#[tokio::test]
async fn test_theme_entry_creation_defaults() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    // existence query finds nothing
    transport.push(items_response(vec![]));
    // ServerRelativeUrl loads for root web, then web
    transport.push(properties_response(string_props(&[(
        "ServerRelativeUrl",
        "/",
    )])));
    transport.push(properties_response(string_props(&[(
        "ServerRelativeUrl",
        "/sites/intranet",
    )])));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let root_web = ctx.root_web();
    let theme = ThemeOption {
        name: "Contoso".to_string(),
        ..Default::default()
    };
    branding::add_theme_option(&mut ctx, web, root_web, &theme).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    let batch = &calls[3];
    assert!(matches!(&batch[0], Action::CreateItem { .. }));
    assert!(batch.iter().any(|action| matches!(
        action,
        Action::SetField { field, value: FieldValue::Url(url), .. }
            if field == "MasterPageUrl"
                && url == "/sites/intranet/_catalogs/masterpage/seattle.master"
    )));
    assert!(batch.iter().any(|action| matches!(
        action,
        Action::SetField { field, value: FieldValue::Number(11), .. } if field == "DisplayOrder"
    )));
    assert!(matches!(batch.last(), Some(Action::Update { .. })));
}

/// Applying an existing composite look sends ApplyTheme with the entry's
/// URLs made server-relative, and stages the master page.
#[tokio::test]
async fn test_set_theme_applies_entry() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(items_response(vec![common::props(&[
        ("Name", json!("Contoso")),
        (
            "ThemeUrl",
            json!({"Url": "https://contoso.sharepoint.com/_catalogs/theme/15/contoso.spcolor"}),
        ),
        ("FontSchemeUrl", json!(null)),
        ("ImageUrl", json!(null)),
        (
            "MasterPageUrl",
            json!({"Url": "https://contoso.sharepoint.com/_catalogs/masterpage/seattle.master"}),
        ),
    ])]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let root_web = ctx.root_web();
    let applied = branding::set_theme(&mut ctx, web, root_web, "Contoso").await.unwrap();
    assert!(applied);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    let batch = &calls[1];
    assert!(matches!(
        &batch[0],
        Action::ApplyTheme { color_url: Some(url), font_url: None, background_url: None, share_generated: false, .. }
            if url == "/_catalogs/theme/15/contoso.spcolor"
    ));
    assert!(batch.iter().any(|action| matches!(
        action,
        Action::SetField { field, value: FieldValue::Url(url), .. }
            if field == "MasterUrl" && url == "/_catalogs/masterpage/seattle.master"
    )));
}

/// Applying a composite look that does not exist changes nothing and
/// reports it.
#[tokio::test]
async fn test_set_theme_missing_entry() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(items_response(vec![]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let root_web = ctx.root_web();
    let applied = branding::set_theme(&mut ctx, web, root_web, "Nonexistent").await.unwrap();
    assert!(!applied);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

/// Setting the master page by name resolves it from the gallery with a
/// case-insensitive substring match on FileRef.
#[tokio::test]
async fn test_set_master_page_by_name_resolves_url() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(items_response(vec![
        string_props(&[("FileRef", "/_catalogs/masterpage/Seattle.master")]),
        string_props(&[("FileRef", "/_catalogs/masterpage/Contoso.master")]),
    ]));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    branding::set_master_page_by_name(&mut ctx, web, "contoso.master").await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].iter().any(|action| matches!(
        action,
        Action::SetField { field, value: FieldValue::Url(url), .. }
            if field == "MasterUrl" && url == "/_catalogs/masterpage/contoso.master"
    )));
}

/// A gallery that forces checkout gets the full checked-out lifecycle:
/// check out before the metadata, check in (major) and publish after.
#[tokio::test]
async fn test_gated_gallery_checks_out_and_publishes() {
    let source = std::env::temp_dir().join("spo-cli-gated-test.master");
    std::fs::write(&source, b"<%@ Master %>").unwrap();

    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    // gallery settings and root folder url
    transport.push(BatchResponse::new(vec![
        ActionResult::Properties(common::props(&[
            ("ForceCheckout", json!(true)),
            ("EnableVersioning", json!(false)),
        ])),
        ActionResult::Properties(string_props(&[(
            "ServerRelativeUrl",
            "/_catalogs/masterpage",
        )])),
    ]));
    // file upload
    transport.push(BatchResponse::all_done(1));
    // the uploaded file is not checked out yet
    transport.push(properties_response(string_props(&[(
        "CheckOutType",
        "None",
    )])));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    branding::deploy_master_page(&mut ctx, web, &source, "Gated", "", "15").await.unwrap();
    std::fs::remove_file(&source).unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    let batch = &calls[3];
    assert!(matches!(&batch[0], Action::CheckOut { .. }));
    assert!(batch.iter().any(|action| matches!(
        action,
        Action::CheckIn { major: true, .. }
    )));
    assert!(matches!(batch.last(), Some(Action::Publish { .. })));
}

/// Without forced checkout or versioning the metadata is written directly;
/// no checkout lifecycle actions are sent.
#[tokio::test]
async fn test_ungated_gallery_skips_checkout_lifecycle() {
    let source = std::env::temp_dir().join("spo-cli-ungated-test.master");
    std::fs::write(&source, b"<%@ Master %>").unwrap();

    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(BatchResponse::new(vec![
        ActionResult::Properties(common::props(&[
            ("ForceCheckout", json!(false)),
            ("EnableVersioning", json!(false)),
        ])),
        ActionResult::Properties(string_props(&[(
            "ServerRelativeUrl",
            "/_catalogs/masterpage",
        )])),
    ]));
    transport.push(BatchResponse::all_done(1));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    branding::deploy_master_page(&mut ctx, web, &source, "Ungated", "", "15").await.unwrap();
    std::fs::remove_file(&source).unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().flatten().all(|action| !matches!(
        action,
        Action::CheckOut { .. } | Action::CheckIn { .. } | Action::Publish { .. }
    )));
}

/// Theme files that do not exist locally are skipped without an upload; the
/// composite look entry is still created, minus the missing URL fields.
#[tokio::test]
async fn test_missing_theme_files_are_skipped_silently() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(items_response(vec![]));
    transport.push(properties_response(string_props(&[(
        "ServerRelativeUrl",
        "/",
    )])));
    transport.push(properties_response(string_props(&[(
        "ServerRelativeUrl",
        "/sites/intranet",
    )])));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let root_web = ctx.root_web();
    let theme = ThemeOption {
        name: "Contoso".to_string(),
        color_file: Some(std::path::PathBuf::from("/nonexistent/contoso.spcolor")),
        background_image: Some(std::path::PathBuf::from("/nonexistent/bg.jpg")),
        ..Default::default()
    };
    branding::deploy_theme(&mut ctx, web, root_web, &theme).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().flatten().all(|action| !matches!(action, Action::AddFile { .. })));
    assert!(calls[3].iter().all(|action| !matches!(
        action,
        Action::SetField { field, .. } if field == "ThemeUrl" || field == "ImageUrl"
    )));
}

/// A missing local site logo is the sanctioned silent skip: no round trip,
/// no error.
#[tokio::test]
async fn test_missing_site_logo_is_skipped_silently() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    let mut ctx = context_with(transport);

    let web = ctx.web();
    branding::set_site_logo(&mut ctx, web, std::path::Path::new("/nonexistent/logo.png"))
        .await
        .unwrap();
    assert!(calls.lock().unwrap().is_empty());
}

/// Setting both master pages resolves each name and commits MasterUrl and
/// CustomMasterUrl in turn.
#[tokio::test]
async fn test_set_master_pages_sets_both() {
    let gallery_items = vec![
        string_props(&[("FileRef", "/_catalogs/masterpage/Contoso.master")]),
        string_props(&[("FileRef", "/_catalogs/masterpage/Oslo.master")]),
    ];
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    transport.push(items_response(gallery_items.clone()));
    transport.push(BatchResponse::all_done(2));
    transport.push(items_response(gallery_items));
    let mut ctx = context_with(transport);

    let web = ctx.web();
    branding::set_master_pages(&mut ctx, web, "contoso.master", "oslo.master")
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    assert!(calls[1].iter().any(|action| matches!(
        action,
        Action::SetField { field, value: FieldValue::Url(url), .. }
            if field == "MasterUrl" && url == "/_catalogs/masterpage/contoso.master"
    )));
    assert!(calls[3].iter().any(|action| matches!(
        action,
        Action::SetField { field, value: FieldValue::Url(url), .. }
            if field == "CustomMasterUrl" && url == "/_catalogs/masterpage/oslo.master"
    )));
}

/// Restricting web templates writes both the template list and the
/// inheritance switch to the property bag.
#[tokio::test]
async fn test_set_available_web_templates_updates_property_bag() {
    let transport = ScriptedTransport::new();
    let calls = transport.calls();
    let mut ctx = context_with(transport);

    let web = ctx.web();
    let templates = vec![
        spo_cli::propbag::WebTemplateEntity {
            language_code: "1033".to_string(),
            template_name: "STS#0".to_string(),
        },
        spo_cli::propbag::WebTemplateEntity {
            language_code: String::new(),
            template_name: "BLANKINTERNET#0".to_string(),
        },
    ];
    branding::set_available_web_templates(&mut ctx, web, &templates).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].iter().any(|action| matches!(
        action,
        Action::SetPropertyBag { key, value, .. }
            if key == "__WebTemplates" && value.contains("BLANKINTERNET#0")
    )));
    assert!(calls[1].iter().any(|action| matches!(
        action,
        Action::SetPropertyBag { key, value, .. }
            if key == "__InheritWebTemplates" && value == "False"
    )));
}
