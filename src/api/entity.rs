//! Local proxies for remote objects.
//!
//! Every remote entity the client touches is represented by an [`ObjectId`]
//! handle into the context's object table. A handle knows how to address the
//! remote object ([`ObjectPath`]) and which properties have been hydrated so
//! far. Field updates go through the [`FieldValue`] tagged union rather than
//! dynamic field access.

use std::collections::HashMap;
use uuid::Uuid;

/// Opaque handle to an entry in the context's object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What kind of remote object a handle stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Web,
    Site,
    List,
    ListItem,
    ItemCollection,
    Folder,
    File,
    NavigationCollection,
    NavigationNode,
    FeatureCollection,
    Feature,
    TermStore,
    TermGroup,
    TermSet,
    Term,
    ContentType,
    CustomActionCollection,
    CustomAction,
}

/// Which navigation collection of a web to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    QuickLaunch,
    TopNavigationBar,
}

/// Scope at which a feature lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureScope {
    Web,
    Site,
}

impl std::fmt::Display for FeatureScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureScope::Web => write!(f, "Web"),
            FeatureScope::Site => write!(f, "Site"),
        }
    }
}

/// How a handle addresses its remote object. Paths reference parent handles
/// by id; the server resolves the chain within a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPath {
    Web,
    RootWeb,
    Site,
    Catalog { web: ObjectId, template_id: u32 },
    ListByTitle { web: ObjectId, title: String },
    RootFolder { list: ObjectId },
    WebRootFolder { web: ObjectId },
    SubFolder { parent: ObjectId, name: String },
    Items { list: ObjectId, view_xml: String },
    ItemById { list: ObjectId, id: i64 },
    NewItem { list: ObjectId },
    FileListItem { file: ObjectId },
    Navigation { web: ObjectId, kind: NavigationKind },
    NavigationChildren { node: ObjectId },
    NavigationNodeById { id: i64 },
    Features { scope: FeatureScope },
    FeatureById { features: ObjectId, definition_id: Uuid },
    TermStore,
    TermGroup { store: ObjectId, name: String },
    TermSet { group: ObjectId, name: String },
    Term { parent: ObjectId, name: String },
    ContentTypeById { web: ObjectId, id: String },
    UserCustomActions { web: ObjectId },
    CustomActionById { actions: ObjectId, id: String },
}

/// Loaded scalar properties of a remote object.
pub type PropertyMap = HashMap<String, serde_json::Value>;

/// A staged field value. The tagged union mirrors the field types the
/// helpers actually write; anything else is a modelling gap, not a string.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Bool(bool),
    Url(String),
}

impl FieldValue {
    /// Value type name as used in the wire request.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "Text",
            FieldValue::Number(_) => "Number",
            FieldValue::Bool(_) => "Boolean",
            FieldValue::Url(_) => "Url",
        }
    }

    /// Wire representation of the value itself.
    pub fn to_wire_string(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Url(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value as i64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Payload for creating a file in a remote folder.
#[derive(Debug, Clone, PartialEq)]
pub struct FileCreation {
    /// Server-relative URL of the file to create.
    pub url: String,
    pub content: Vec<u8>,
    pub overwrite: bool,
}

/// Payload for creating a navigation node.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationNodeCreation {
    pub title: String,
    /// Empty string for a heading node without a link.
    pub url: String,
    pub as_last_node: bool,
}

/// State a handle keeps locally: identity, address, hydrated properties and,
/// for collections, the resolved children.
#[derive(Debug, Clone)]
pub struct ObjectState {
    pub kind: ObjectKind,
    pub path: ObjectPath,
    pub properties: PropertyMap,
    pub children: Option<Vec<ObjectId>>,
}

impl ObjectState {
    pub fn new(kind: ObjectKind, path: ObjectPath) -> Self {
        Self {
            kind,
            path,
            properties: PropertyMap::new(),
            children: None,
        }
    }

    pub fn is_property_loaded(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}
