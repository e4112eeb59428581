//! Wire seam between the context and the server.
//!
//! The context never talks HTTP directly; it hands its object paths and
//! queued actions to a [`Transport`]. The production implementation
//! serializes them into one XML request against the site's
//! `ProcessQuery` endpoint and parses the JSON response. Tests substitute
//! scripted transports.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, trace};

use super::constants;
use super::entity::{FeatureScope, NavigationKind, ObjectId, ObjectPath, PropertyMap};
use super::error::RemoteFault;
use super::operations::{Action, ActionResult, BatchResponse};
use crate::xmlutil::XmlWriter;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one batched round trip. `paths` describes every registered
    /// handle (id → remote address); `actions` is the pending queue in order.
    /// The response must carry exactly one result per action.
    async fn execute_batch(
        &self,
        site_url: &str,
        paths: &[(ObjectId, ObjectPath)],
        actions: &[Action],
    ) -> Result<BatchResponse, RemoteFault>;
}

/// Transport that posts batches to the site's client endpoint.
pub struct HttpTransport {
    http_client: reqwest::Client,
    access_token: String,
}

impl HttpTransport {
    pub fn new(http_client: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute_batch(
        &self,
        site_url: &str,
        paths: &[(ObjectId, ObjectPath)],
        actions: &[Action],
    ) -> Result<BatchResponse, RemoteFault> {
        let body = serialize_request(paths, actions);
        trace!("batch request body:\n{}", body);

        let url = format!(
            "{}{}",
            site_url.trim_end_matches('/'),
            constants::PROCESS_QUERY_ENDPOINT
        );
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RemoteFault::Http {
                status: status.as_u16(),
                body: text,
            });
        }
        debug!("batch of {} action(s) accepted by {}", actions.len(), url);
        parse_response(&text)
    }
}

/// Serialize object paths and actions into the batch request document.
pub fn serialize_request(paths: &[(ObjectId, ObjectPath)], actions: &[Action]) -> String {
    let mut writer = XmlWriter::new();
    writer.add_opening_tag(
        "Request",
        &[
            ("SchemaVersion", constants::SCHEMA_VERSION),
            ("LibraryVersion", constants::LIBRARY_VERSION),
            ("ApplicationName", constants::APPLICATION_NAME),
        ],
    );

    writer.add_opening_tag("Actions", &[]);
    for action in actions {
        write_action(&mut writer, action);
    }
    writer.add_closing_tag("Actions");

    writer.add_opening_tag("ObjectPaths", &[]);
    for (id, path) in paths {
        write_path(&mut writer, *id, path);
    }
    writer.add_closing_tag("ObjectPaths");

    writer.add_closing_tag("Request");
    writer.finish()
}

fn id_attr(id: ObjectId) -> String {
    id.value().to_string()
}

fn write_path(writer: &mut XmlWriter, id: ObjectId, path: &ObjectPath) {
    let id = id_attr(id);
    match path {
        ObjectPath::Web => writer.add_self_closing_tag("Web", &[("Id", &id)]),
        ObjectPath::RootWeb => writer.add_self_closing_tag("RootWeb", &[("Id", &id)]),
        ObjectPath::Site => writer.add_self_closing_tag("Site", &[("Id", &id)]),
        ObjectPath::Catalog { web, template_id } => writer.add_self_closing_tag(
            "Catalog",
            &[
                ("Id", &id),
                ("ParentId", &id_attr(*web)),
                ("TemplateId", &template_id.to_string()),
            ],
        ),
        ObjectPath::ListByTitle { web, title } => writer.add_self_closing_tag(
            "List",
            &[("Id", &id), ("ParentId", &id_attr(*web)), ("Title", title)],
        ),
        ObjectPath::RootFolder { list } => writer
            .add_self_closing_tag("RootFolder", &[("Id", &id), ("ParentId", &id_attr(*list))]),
        ObjectPath::WebRootFolder { web } => writer
            .add_self_closing_tag("WebRootFolder", &[("Id", &id), ("ParentId", &id_attr(*web))]),
        ObjectPath::SubFolder { parent, name } => writer.add_self_closing_tag(
            "Folder",
            &[("Id", &id), ("ParentId", &id_attr(*parent)), ("Name", name)],
        ),
        ObjectPath::Items { list, view_xml } => {
            writer.add_opening_tag("Items", &[("Id", &id), ("ParentId", &id_attr(*list))]);
            writer.add_text_element("ViewXml", &[], view_xml);
            writer.add_closing_tag("Items");
        }
        ObjectPath::ItemById { list, id: item_id } => writer.add_self_closing_tag(
            "Item",
            &[
                ("Id", &id),
                ("ParentId", &id_attr(*list)),
                ("ItemId", &item_id.to_string()),
            ],
        ),
        ObjectPath::NewItem { list } => {
            writer.add_self_closing_tag("NewItem", &[("Id", &id), ("ParentId", &id_attr(*list))])
        }
        ObjectPath::FileListItem { file } => writer.add_self_closing_tag(
            "FileListItem",
            &[("Id", &id), ("ParentId", &id_attr(*file))],
        ),
        ObjectPath::Navigation { web, kind } => {
            let kind = match kind {
                NavigationKind::QuickLaunch => "QuickLaunch",
                NavigationKind::TopNavigationBar => "TopNavigationBar",
            };
            writer.add_self_closing_tag(
                "Navigation",
                &[("Id", &id), ("ParentId", &id_attr(*web)), ("Kind", kind)],
            )
        }
        ObjectPath::NavigationChildren { node } => writer.add_self_closing_tag(
            "NavigationChildren",
            &[("Id", &id), ("ParentId", &id_attr(*node))],
        ),
        ObjectPath::NavigationNodeById { id: node_id } => writer.add_self_closing_tag(
            "NavigationNode",
            &[("Id", &id), ("NodeId", &node_id.to_string())],
        ),
        ObjectPath::Features { scope } => {
            let scope = match scope {
                FeatureScope::Web => "Web",
                FeatureScope::Site => "Site",
            };
            writer.add_self_closing_tag("Features", &[("Id", &id), ("Scope", scope)])
        }
        ObjectPath::FeatureById {
            features,
            definition_id,
        } => writer.add_self_closing_tag(
            "Feature",
            &[
                ("Id", &id),
                ("ParentId", &id_attr(*features)),
                ("DefinitionId", &definition_id.to_string()),
            ],
        ),
        ObjectPath::TermStore => writer.add_self_closing_tag("TermStore", &[("Id", &id)]),
        ObjectPath::TermGroup { store, name } => writer.add_self_closing_tag(
            "TermGroup",
            &[("Id", &id), ("ParentId", &id_attr(*store)), ("Name", name)],
        ),
        ObjectPath::TermSet { group, name } => writer.add_self_closing_tag(
            "TermSet",
            &[("Id", &id), ("ParentId", &id_attr(*group)), ("Name", name)],
        ),
        ObjectPath::Term { parent, name } => writer.add_self_closing_tag(
            "Term",
            &[("Id", &id), ("ParentId", &id_attr(*parent)), ("Name", name)],
        ),
        ObjectPath::ContentTypeById { web, id: ct_id } => writer.add_self_closing_tag(
            "ContentType",
            &[
                ("Id", &id),
                ("ParentId", &id_attr(*web)),
                ("ContentTypeId", ct_id),
            ],
        ),
        ObjectPath::UserCustomActions { web } => writer.add_self_closing_tag(
            "UserCustomActions",
            &[("Id", &id), ("ParentId", &id_attr(*web))],
        ),
        ObjectPath::CustomActionById { actions, id: action_id } => writer.add_self_closing_tag(
            "CustomAction",
            &[
                ("Id", &id),
                ("ParentId", &id_attr(*actions)),
                ("ActionId", action_id),
            ],
        ),
    }
}

fn write_action(writer: &mut XmlWriter, action: &Action) {
    match action {
        Action::Load { target, properties } => {
            if properties.is_empty() {
                writer.add_self_closing_tag("Load", &[("ObjectId", &id_attr(*target))]);
            } else {
                writer.add_opening_tag("Load", &[("ObjectId", &id_attr(*target))]);
                for property in properties {
                    writer.add_self_closing_tag("Property", &[("Name", property)]);
                }
                writer.add_closing_tag("Load");
            }
        }
        Action::Query { target } => {
            writer.add_self_closing_tag("Query", &[("ObjectId", &id_attr(*target))])
        }
        Action::SetField {
            target,
            field,
            value,
        } => {
            writer.add_opening_tag(
                "SetField",
                &[("ObjectId", &id_attr(*target)), ("Name", field)],
            );
            writer.add_text_element(
                "Value",
                &[("Type", value.type_name())],
                &value.to_wire_string(),
            );
            writer.add_closing_tag("SetField");
        }
        Action::Update { target } => {
            writer.add_self_closing_tag("Update", &[("ObjectId", &id_attr(*target))])
        }
        Action::CreateItem { list, result } => writer.add_self_closing_tag(
            "CreateItem",
            &[("ObjectId", &id_attr(*list)), ("ResultId", &id_attr(*result))],
        ),
        Action::DeleteObject { target } => {
            writer.add_self_closing_tag("DeleteObject", &[("ObjectId", &id_attr(*target))])
        }
        Action::AddNavigationNode {
            parent,
            node,
            result,
        } => writer.add_self_closing_tag(
            "AddNavigationNode",
            &[
                ("ObjectId", &id_attr(*parent)),
                ("ResultId", &id_attr(*result)),
                ("Title", &node.title),
                ("Url", &node.url),
                ("AsLastNode", if node.as_last_node { "true" } else { "false" }),
            ],
        ),
        Action::AddFile {
            folder,
            file,
            result,
        } => {
            writer.add_opening_tag(
                "AddFile",
                &[
                    ("ObjectId", &id_attr(*folder)),
                    ("ResultId", &id_attr(*result)),
                    ("Url", &file.url),
                    ("Overwrite", if file.overwrite { "true" } else { "false" }),
                ],
            );
            writer.add_text_element("Content", &[], &BASE64.encode(&file.content));
            writer.add_closing_tag("AddFile");
        }
        Action::CheckOut { target } => {
            writer.add_self_closing_tag("CheckOut", &[("ObjectId", &id_attr(*target))])
        }
        Action::CheckIn {
            target,
            comment,
            major,
        } => writer.add_self_closing_tag(
            "CheckIn",
            &[
                ("ObjectId", &id_attr(*target)),
                ("Comment", comment),
                ("CheckinType", if *major { "Major" } else { "Minor" }),
            ],
        ),
        Action::Publish { target, comment } => writer.add_self_closing_tag(
            "Publish",
            &[("ObjectId", &id_attr(*target)), ("Comment", comment)],
        ),
        Action::ApplyTheme {
            target,
            color_url,
            font_url,
            background_url,
            share_generated,
        } => {
            writer.add_opening_tag(
                "ApplyTheme",
                &[
                    ("ObjectId", &id_attr(*target)),
                    ("ShareGenerated", if *share_generated { "true" } else { "false" }),
                ],
            );
            if let Some(url) = color_url {
                writer.add_text_element("ColorPaletteUrl", &[], url);
            }
            if let Some(url) = font_url {
                writer.add_text_element("FontSchemeUrl", &[], url);
            }
            if let Some(url) = background_url {
                writer.add_text_element("BackgroundImageUrl", &[], url);
            }
            writer.add_closing_tag("ApplyTheme");
        }
        Action::ActivateFeature {
            features,
            definition_id,
            force,
        } => writer.add_self_closing_tag(
            "ActivateFeature",
            &[
                ("ObjectId", &id_attr(*features)),
                ("FeatureId", &definition_id.to_string()),
                ("Force", if *force { "true" } else { "false" }),
            ],
        ),
        Action::DeactivateFeature {
            features,
            definition_id,
            force,
        } => writer.add_self_closing_tag(
            "DeactivateFeature",
            &[
                ("ObjectId", &id_attr(*features)),
                ("FeatureId", &definition_id.to_string()),
                ("Force", if *force { "true" } else { "false" }),
            ],
        ),
        Action::SetPropertyBag { web, key, value } => {
            writer.add_opening_tag(
                "SetPropertyBagValue",
                &[("ObjectId", &id_attr(*web)), ("Key", key)],
            );
            writer.add_text_element("Value", &[], value);
            writer.add_closing_tag("SetPropertyBagValue");
        }
        Action::EnsureTermGroup {
            store,
            name,
            result,
        } => writer.add_self_closing_tag(
            "EnsureTermGroup",
            &[
                ("ObjectId", &id_attr(*store)),
                ("ResultId", &id_attr(*result)),
                ("Name", name),
            ],
        ),
        Action::EnsureTermSet {
            group,
            name,
            lcid,
            result,
        } => writer.add_self_closing_tag(
            "EnsureTermSet",
            &[
                ("ObjectId", &id_attr(*group)),
                ("ResultId", &id_attr(*result)),
                ("Name", name),
                ("Lcid", &lcid.to_string()),
            ],
        ),
        Action::EnsureTerm {
            parent,
            name,
            lcid,
            result,
        } => writer.add_self_closing_tag(
            "EnsureTerm",
            &[
                ("ObjectId", &id_attr(*parent)),
                ("ResultId", &id_attr(*result)),
                ("Name", name),
                ("Lcid", &lcid.to_string()),
            ],
        ),
        Action::AddCustomAction { actions, result } => writer.add_self_closing_tag(
            "AddCustomAction",
            &[
                ("ObjectId", &id_attr(*actions)),
                ("ResultId", &id_attr(*result)),
            ],
        ),
    }
}

/// Parse the JSON batch response into positional action results.
///
/// Shape: `{"ErrorInfo": null | {…}, "Results": [null | {…} | [{…}, …], …]}`.
/// A non-null `ErrorInfo` means the batch failed server-side and is
/// surfaced as a [`RemoteFault::Server`].
pub fn parse_response(body: &str) -> Result<BatchResponse, RemoteFault> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| RemoteFault::Transport(format!("unparseable batch response: {}", e)))?;

    if let Some(error) = value.get("ErrorInfo").filter(|v| !v.is_null()) {
        let code = error
            .get("ErrorTypeName")
            .and_then(|v| v.as_str())
            .unwrap_or("UnknownError")
            .to_string();
        let message = error
            .get("ErrorMessage")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        return Err(RemoteFault::Server { code, message });
    }

    let results = value
        .get("Results")
        .and_then(|v| v.as_array())
        .ok_or_else(|| RemoteFault::Transport("batch response missing Results".to_string()))?;

    let mut parsed = Vec::with_capacity(results.len());
    for result in results {
        parsed.push(match result {
            serde_json::Value::Null => ActionResult::Done,
            serde_json::Value::Object(map) => ActionResult::Properties(to_property_map(map)),
            serde_json::Value::Array(entries) => {
                let mut items = Vec::with_capacity(entries.len());
                for entry in entries {
                    let map = entry.as_object().ok_or_else(|| {
                        RemoteFault::Transport("collection entry is not an object".to_string())
                    })?;
                    items.push(to_property_map(map));
                }
                ActionResult::Items(items)
            }
            other => {
                return Err(RemoteFault::Transport(format!(
                    "unexpected result payload: {}",
                    other
                )));
            }
        });
    }
    Ok(BatchResponse::new(parsed))
}

fn to_property_map(map: &serde_json::Map<String, serde_json::Value>) -> PropertyMap {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
