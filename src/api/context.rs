//! The remote object mutation client.
//!
//! A [`ClientContext`] is bound to one site URL and owns the pending-action
//! queue, the object table and the transport. Usage always follows the same
//! shape: resolve a handle, ensure the properties you need are loaded, stage
//! mutations, then flush one batched round trip with [`execute_query`].
//!
//! The context is strictly sequential: one logical caller, one in-flight
//! round trip, no pipelining. A remote fault aborts the whole batch from the
//! caller's point of view and is surfaced verbatim.
//!
//! [`execute_query`]: ClientContext::execute_query

use std::collections::HashMap;

use anyhow::{Result, anyhow, bail};
use log::{debug, trace};
use uuid::Uuid;

use super::entity::{
    FeatureScope, FieldValue, FileCreation, NavigationKind, NavigationNodeCreation, ObjectId,
    ObjectKind, ObjectPath, ObjectState, PropertyMap,
};
use super::error::RemoteFault;
use super::operations::{Action, ActionResult, BatchResponse};
use super::transport::Transport;
use crate::caml::CamlQuery;

pub struct ClientContext {
    site_url: String,
    transport: Box<dyn Transport>,
    objects: HashMap<ObjectId, ObjectState>,
    pending: Vec<Action>,
    next_id: u64,
    web_id: Option<ObjectId>,
    root_web_id: Option<ObjectId>,
    site_id: Option<ObjectId>,
    term_store_id: Option<ObjectId>,
}

impl ClientContext {
    pub fn new(site_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            site_url: site_url.into(),
            transport,
            objects: HashMap::new(),
            pending: Vec::new(),
            next_id: 1,
            web_id: None,
            root_web_id: None,
            site_id: None,
            term_store_id: None,
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn register(&mut self, kind: ObjectKind, path: ObjectPath) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, ObjectState::new(kind, path));
        trace!("registered handle {:?} as {:?}", id, kind);
        id
    }

    fn state(&self, id: ObjectId) -> Result<&ObjectState> {
        self.objects
            .get(&id)
            .ok_or_else(|| anyhow!("unknown object handle {:?}", id))
    }

    // --- resolve ---

    /// Handle to the web the context is bound to.
    pub fn web(&mut self) -> ObjectId {
        if let Some(id) = self.web_id {
            return id;
        }
        let id = self.register(ObjectKind::Web, ObjectPath::Web);
        self.web_id = Some(id);
        id
    }

    /// Handle to the root web of the site collection.
    pub fn root_web(&mut self) -> ObjectId {
        if let Some(id) = self.root_web_id {
            return id;
        }
        let id = self.register(ObjectKind::Web, ObjectPath::RootWeb);
        self.root_web_id = Some(id);
        id
    }

    /// Handle to the site collection itself.
    pub fn site(&mut self) -> ObjectId {
        if let Some(id) = self.site_id {
            return id;
        }
        let id = self.register(ObjectKind::Site, ObjectPath::Site);
        self.site_id = Some(id);
        id
    }

    /// Handle to a well-known catalog list by its template id.
    pub fn catalog(&mut self, web: ObjectId, template_id: u32) -> ObjectId {
        self.register(ObjectKind::List, ObjectPath::Catalog { web, template_id })
    }

    pub fn list_by_title(&mut self, web: ObjectId, title: impl Into<String>) -> ObjectId {
        self.register(
            ObjectKind::List,
            ObjectPath::ListByTitle {
                web,
                title: title.into(),
            },
        )
    }

    pub fn root_folder(&mut self, list: ObjectId) -> ObjectId {
        self.register(ObjectKind::Folder, ObjectPath::RootFolder { list })
    }

    /// Handle to a web's root folder (not a list's).
    pub fn web_root_folder(&mut self, web: ObjectId) -> ObjectId {
        self.register(ObjectKind::Folder, ObjectPath::WebRootFolder { web })
    }

    /// Handle to a content type addressed by its id string.
    pub fn content_type_by_id(&mut self, web: ObjectId, id: impl Into<String>) -> ObjectId {
        self.register(
            ObjectKind::ContentType,
            ObjectPath::ContentTypeById {
                web,
                id: id.into(),
            },
        )
    }

    /// Handle to a web's user custom actions collection.
    pub fn user_custom_actions(&mut self, web: ObjectId) -> ObjectId {
        self.register(
            ObjectKind::CustomActionCollection,
            ObjectPath::UserCustomActions { web },
        )
    }

    pub fn sub_folder(&mut self, parent: ObjectId, name: impl Into<String>) -> ObjectId {
        self.register(
            ObjectKind::Folder,
            ObjectPath::SubFolder {
                parent,
                name: name.into(),
            },
        )
    }

    /// Handle to a web's quick launch or top navigation collection.
    pub fn navigation(&mut self, web: ObjectId, kind: NavigationKind) -> ObjectId {
        self.register(
            ObjectKind::NavigationCollection,
            ObjectPath::Navigation { web, kind },
        )
    }

    /// Handle to the child nodes of a navigation node.
    pub fn navigation_children(&mut self, node: ObjectId) -> ObjectId {
        self.register(
            ObjectKind::NavigationCollection,
            ObjectPath::NavigationChildren { node },
        )
    }

    /// Handle to the activated features collection at the given scope.
    pub fn features(&mut self, scope: FeatureScope) -> ObjectId {
        self.register(ObjectKind::FeatureCollection, ObjectPath::Features { scope })
    }

    /// Handle to the default taxonomy term store.
    pub fn term_store(&mut self) -> ObjectId {
        if let Some(id) = self.term_store_id {
            return id;
        }
        let id = self.register(ObjectKind::TermStore, ObjectPath::TermStore);
        self.term_store_id = Some(id);
        id
    }

    /// Queue a CAML query against a list; the returned collection handle is
    /// populated on the next flush.
    pub fn query_items(&mut self, list: ObjectId, query: &CamlQuery) -> ObjectId {
        let target = self.register(
            ObjectKind::ItemCollection,
            ObjectPath::Items {
                list,
                view_xml: query.view_xml().to_string(),
            },
        );
        self.pending.push(Action::Query { target });
        target
    }

    // --- hydration ---

    /// Queue hydration of named properties.
    pub fn load(&mut self, target: ObjectId, properties: &[&str]) {
        self.pending.push(Action::Load {
            target,
            properties: properties.iter().map(|p| p.to_string()).collect(),
        });
    }

    /// Queue hydration of a collection's members.
    pub fn load_collection(&mut self, target: ObjectId) {
        self.pending.push(Action::Load {
            target,
            properties: Vec::new(),
        });
    }

    pub fn is_property_loaded(&self, target: ObjectId, property: &str) -> bool {
        self.objects
            .get(&target)
            .map(|state| state.is_property_loaded(property))
            .unwrap_or(false)
    }

    pub fn is_collection_loaded(&self, target: ObjectId) -> bool {
        self.objects
            .get(&target)
            .map(|state| state.children.is_some())
            .unwrap_or(false)
    }

    /// Hydrate one property if it is not already loaded. A second call for an
    /// already-loaded property is a no-op and issues no round trip.
    pub async fn ensure_loaded(&mut self, target: ObjectId, property: &str) -> Result<()> {
        if self.is_property_loaded(target, property) {
            debug!("property '{}' already loaded on {:?}", property, target);
            return Ok(());
        }
        self.load(target, &[property]);
        self.execute_query().await?;
        Ok(())
    }

    // --- staged mutations ---

    /// Stage one field value; invisible remotely until a flush succeeds.
    pub fn stage(&mut self, target: ObjectId, field: impl Into<String>, value: FieldValue) {
        self.pending.push(Action::SetField {
            target,
            field: field.into(),
            value,
        });
    }

    /// Queue the commit of previously staged fields on an object.
    pub fn update(&mut self, target: ObjectId) {
        self.pending.push(Action::Update { target });
    }

    pub fn create_item(&mut self, list: ObjectId) -> ObjectId {
        let result = self.register(ObjectKind::ListItem, ObjectPath::NewItem { list });
        self.pending.push(Action::CreateItem { list, result });
        result
    }

    pub fn delete_object(&mut self, target: ObjectId) {
        self.pending.push(Action::DeleteObject { target });
    }

    pub fn add_navigation_node(
        &mut self,
        parent: ObjectId,
        node: NavigationNodeCreation,
    ) -> ObjectId {
        let result = self.register(
            ObjectKind::NavigationNode,
            ObjectPath::NavigationNodeById { id: 0 },
        );
        self.pending.push(Action::AddNavigationNode {
            parent,
            node,
            result,
        });
        result
    }

    pub fn add_file(&mut self, folder: ObjectId, file: FileCreation) -> ObjectId {
        let result = self.register(
            ObjectKind::File,
            ObjectPath::SubFolder {
                parent: folder,
                name: file.url.clone(),
            },
        );
        self.pending.push(Action::AddFile {
            folder,
            file,
            result,
        });
        result
    }

    /// Handle to the list item backing a file (its `ListItemAllFields`).
    pub fn file_list_item(&mut self, file: ObjectId) -> ObjectId {
        self.register(ObjectKind::ListItem, ObjectPath::FileListItem { file })
    }

    pub fn check_out(&mut self, target: ObjectId) {
        self.pending.push(Action::CheckOut { target });
    }

    pub fn check_in(&mut self, target: ObjectId, comment: impl Into<String>, major: bool) {
        self.pending.push(Action::CheckIn {
            target,
            comment: comment.into(),
            major,
        });
    }

    pub fn publish(&mut self, target: ObjectId, comment: impl Into<String>) {
        self.pending.push(Action::Publish {
            target,
            comment: comment.into(),
        });
    }

    pub fn apply_theme(
        &mut self,
        web: ObjectId,
        color_url: Option<String>,
        font_url: Option<String>,
        background_url: Option<String>,
        share_generated: bool,
    ) {
        self.pending.push(Action::ApplyTheme {
            target: web,
            color_url,
            font_url,
            background_url,
            share_generated,
        });
    }

    pub fn activate_feature(&mut self, features: ObjectId, definition_id: Uuid, force: bool) {
        self.pending.push(Action::ActivateFeature {
            features,
            definition_id,
            force,
        });
    }

    pub fn deactivate_feature(&mut self, features: ObjectId, definition_id: Uuid, force: bool) {
        self.pending.push(Action::DeactivateFeature {
            features,
            definition_id,
            force,
        });
    }

    pub fn set_property_bag(
        &mut self,
        web: ObjectId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.pending.push(Action::SetPropertyBag {
            web,
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn ensure_term_group(&mut self, store: ObjectId, name: impl Into<String>) -> ObjectId {
        let name = name.into();
        let result = self.register(
            ObjectKind::TermGroup,
            ObjectPath::TermGroup {
                store,
                name: name.clone(),
            },
        );
        self.pending.push(Action::EnsureTermGroup {
            store,
            name,
            result,
        });
        result
    }

    pub fn ensure_term_set(
        &mut self,
        group: ObjectId,
        name: impl Into<String>,
        lcid: u32,
    ) -> ObjectId {
        let name = name.into();
        let result = self.register(
            ObjectKind::TermSet,
            ObjectPath::TermSet {
                group,
                name: name.clone(),
            },
        );
        self.pending.push(Action::EnsureTermSet {
            group,
            name,
            lcid,
            result,
        });
        result
    }

    /// Path-only reference to a term group; resolution happens on the next
    /// load and faults remotely when the group does not exist.
    pub fn term_group_ref(&mut self, store: ObjectId, name: impl Into<String>) -> ObjectId {
        self.register(
            ObjectKind::TermGroup,
            ObjectPath::TermGroup {
                store,
                name: name.into(),
            },
        )
    }

    pub fn term_set_ref(&mut self, group: ObjectId, name: impl Into<String>) -> ObjectId {
        self.register(
            ObjectKind::TermSet,
            ObjectPath::TermSet {
                group,
                name: name.into(),
            },
        )
    }

    pub fn term_ref(&mut self, parent: ObjectId, name: impl Into<String>) -> ObjectId {
        self.register(
            ObjectKind::Term,
            ObjectPath::Term {
                parent,
                name: name.into(),
            },
        )
    }

    /// Queue creation of a custom action; stage its fields on the returned
    /// handle and follow with [`update`](Self::update).
    pub fn add_custom_action(&mut self, actions: ObjectId) -> ObjectId {
        let result = self.register(
            ObjectKind::CustomAction,
            ObjectPath::CustomActionById {
                actions,
                id: String::new(),
            },
        );
        self.pending.push(Action::AddCustomAction { actions, result });
        result
    }

    pub fn ensure_term(&mut self, parent: ObjectId, name: impl Into<String>, lcid: u32) -> ObjectId {
        let name = name.into();
        let result = self.register(
            ObjectKind::Term,
            ObjectPath::Term {
                parent,
                name: name.clone(),
            },
        );
        self.pending.push(Action::EnsureTerm {
            parent,
            name,
            lcid,
            result,
        });
        result
    }

    // --- flush ---

    /// Send the pending batch in one round trip and apply the results.
    ///
    /// The queue is cleared whether or not the batch succeeds; on a fault
    /// the whole batch is considered aborted and the fault propagates
    /// verbatim. An empty queue returns without touching the network.
    pub async fn execute_query(&mut self) -> Result<(), RemoteFault> {
        if self.pending.is_empty() {
            debug!("execute_query with empty queue, skipping round trip");
            return Ok(());
        }
        let actions = std::mem::take(&mut self.pending);
        debug!(
            "executing batch of {} action(s) against {}",
            actions.len(),
            self.site_url
        );

        let mut paths: Vec<(ObjectId, ObjectPath)> = self
            .objects
            .iter()
            .map(|(id, state)| (*id, state.path.clone()))
            .collect();
        paths.sort_by_key(|(id, _)| id.value());

        let response = self
            .transport
            .execute_batch(&self.site_url, &paths, &actions)
            .await?;
        self.apply(&actions, response)
    }

    fn apply(&mut self, actions: &[Action], response: BatchResponse) -> Result<(), RemoteFault> {
        if response.results.len() != actions.len() {
            return Err(RemoteFault::Transport(format!(
                "batch response has {} result(s) for {} action(s)",
                response.results.len(),
                actions.len()
            )));
        }
        for (action, result) in actions.iter().zip(response.results) {
            let Some(target) = action.result_target() else {
                continue;
            };
            match result {
                ActionResult::Done => {}
                ActionResult::Properties(properties) => {
                    self.apply_properties(target, properties);
                }
                ActionResult::Items(items) => {
                    self.apply_items(target, items);
                }
            }
        }
        Ok(())
    }

    fn apply_properties(&mut self, target: ObjectId, properties: PropertyMap) {
        // a created item learns its permanent address from the response
        if let Some(state) = self.objects.get_mut(&target) {
            if let ObjectPath::NewItem { list } = state.path {
                if let Some(id) = properties.get("ID").and_then(|v| v.as_i64()) {
                    state.path = ObjectPath::ItemById { list, id };
                }
            } else if let ObjectPath::NavigationNodeById { id: 0 } = state.path {
                if let Some(id) = properties.get("Id").and_then(|v| v.as_i64()) {
                    state.path = ObjectPath::NavigationNodeById { id };
                }
            }
            state.properties.extend(properties);
        }
    }

    fn apply_items(&mut self, target: ObjectId, items: Vec<PropertyMap>) {
        let Some(parent) = self.objects.get(&target) else {
            return;
        };
        let parent_kind = parent.kind;
        let parent_path = parent.path.clone();
        let mut children = Vec::with_capacity(items.len());
        for properties in items {
            let (kind, path) = match (&parent_kind, &parent_path) {
                (ObjectKind::ItemCollection, ObjectPath::Items { list, .. }) => (
                    ObjectKind::ListItem,
                    ObjectPath::ItemById {
                        list: *list,
                        id: properties.get("ID").and_then(|v| v.as_i64()).unwrap_or(0),
                    },
                ),
                (ObjectKind::NavigationCollection, _) => (
                    ObjectKind::NavigationNode,
                    ObjectPath::NavigationNodeById {
                        id: properties.get("Id").and_then(|v| v.as_i64()).unwrap_or(0),
                    },
                ),
                (ObjectKind::CustomActionCollection, _) => (
                    ObjectKind::CustomAction,
                    ObjectPath::CustomActionById {
                        actions: target,
                        id: properties
                            .get("Id")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string(),
                    },
                ),
                (ObjectKind::FeatureCollection, _) => {
                    let definition_id = properties
                        .get("DefinitionId")
                        .and_then(|v| v.as_str())
                        .and_then(|s| Uuid::parse_str(s).ok())
                        .unwrap_or_else(Uuid::nil);
                    (
                        ObjectKind::Feature,
                        ObjectPath::FeatureById {
                            features: target,
                            definition_id,
                        },
                    )
                }
                _ => (
                    ObjectKind::ListItem,
                    ObjectPath::ItemById {
                        list: target,
                        id: properties.get("ID").and_then(|v| v.as_i64()).unwrap_or(0),
                    },
                ),
            };
            let child = self.register(kind, path);
            if let Some(state) = self.objects.get_mut(&child) {
                state.properties = properties;
            }
            children.push(child);
        }
        if let Some(state) = self.objects.get_mut(&target) {
            state.children = Some(children);
        }
    }

    // --- property access ---

    /// A loaded string property. Accessing a property that has not been
    /// hydrated is an error, never a silent default.
    pub fn string_prop(&self, target: ObjectId, name: &str) -> Result<String> {
        let value = self.raw_prop(target, name)?;
        value
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("property '{}' is not a string", name))
    }

    pub fn bool_prop(&self, target: ObjectId, name: &str) -> Result<bool> {
        let value = self.raw_prop(target, name)?;
        value
            .as_bool()
            .ok_or_else(|| anyhow!("property '{}' is not a boolean", name))
    }

    pub fn int_prop(&self, target: ObjectId, name: &str) -> Result<i64> {
        let value = self.raw_prop(target, name)?;
        value
            .as_i64()
            .ok_or_else(|| anyhow!("property '{}' is not an integer", name))
    }

    fn raw_prop(&self, target: ObjectId, name: &str) -> Result<&serde_json::Value> {
        let state = self.state(target)?;
        state.properties.get(name).ok_or_else(|| {
            anyhow!(
                "property '{}' has not been loaded on {:?} handle",
                name,
                state.kind
            )
        })
    }

    /// A URL field that may be absent, null, a plain string or a
    /// `{"Url": …}` object. Absent and null both read as `None`.
    pub fn opt_url_prop(&self, target: ObjectId, name: &str) -> Result<Option<String>> {
        let state = self.state(target)?;
        let Some(value) = state.properties.get(name) else {
            return Ok(None);
        };
        let url = match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => map
                .get("Url")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            other => bail!("property '{}' is not a URL value: {}", name, other),
        };
        Ok(url)
    }

    /// Like [`opt_url_prop`](Self::opt_url_prop) for plain string fields.
    pub fn opt_string_prop(&self, target: ObjectId, name: &str) -> Result<Option<String>> {
        let state = self.state(target)?;
        Ok(state
            .properties
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()))
    }

    /// Read one entry of a loaded map-valued property (e.g. the web's
    /// `AllProperties` bag). Absent key reads as `None`.
    pub fn map_prop_entry(
        &self,
        target: ObjectId,
        property: &str,
        key: &str,
    ) -> Result<Option<String>> {
        let value = self.raw_prop(target, property)?;
        let map = value
            .as_object()
            .ok_or_else(|| anyhow!("property '{}' is not a map", property))?;
        Ok(map
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    pub fn item_count(&self, collection: ObjectId) -> Result<usize> {
        let state = self.state(collection)?;
        state
            .children
            .as_ref()
            .map(|children| children.len())
            .ok_or_else(|| anyhow!("collection has not been loaded"))
    }

    pub fn items(&self, collection: ObjectId) -> Result<Vec<ObjectId>> {
        let state = self.state(collection)?;
        state
            .children
            .clone()
            .ok_or_else(|| anyhow!("collection has not been loaded"))
    }
}
