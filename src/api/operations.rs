//! Batched actions and their results.
//!
//! Every mutation or hydration the client performs is queued as an [`Action`]
//! and shipped in one round trip by [`crate::api::ClientContext::execute_query`].
//! Results come back positionally: one [`ActionResult`] per queued action.

use uuid::Uuid;

use super::entity::{FieldValue, FileCreation, NavigationNodeCreation, ObjectId, PropertyMap};

/// A single queued remote operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hydrate named scalar properties of an object. An empty property list
    /// loads the object (or collection) itself.
    Load {
        target: ObjectId,
        properties: Vec<String>,
    },
    /// Run the CAML query baked into the target collection's path.
    Query { target: ObjectId },
    /// Stage one field value on an object.
    SetField {
        target: ObjectId,
        field: String,
        value: FieldValue,
    },
    /// Commit staged field values on an object.
    Update { target: ObjectId },
    /// Create a list item; staged fields follow as `SetField` on `result`.
    CreateItem { list: ObjectId, result: ObjectId },
    DeleteObject { target: ObjectId },
    AddNavigationNode {
        parent: ObjectId,
        node: NavigationNodeCreation,
        result: ObjectId,
    },
    AddFile {
        folder: ObjectId,
        file: FileCreation,
        result: ObjectId,
    },
    CheckOut { target: ObjectId },
    CheckIn {
        target: ObjectId,
        comment: String,
        major: bool,
    },
    Publish { target: ObjectId, comment: String },
    ApplyTheme {
        target: ObjectId,
        color_url: Option<String>,
        font_url: Option<String>,
        background_url: Option<String>,
        share_generated: bool,
    },
    ActivateFeature {
        features: ObjectId,
        definition_id: Uuid,
        force: bool,
    },
    DeactivateFeature {
        features: ObjectId,
        definition_id: Uuid,
        force: bool,
    },
    SetPropertyBag {
        web: ObjectId,
        key: String,
        value: String,
    },
    EnsureTermGroup {
        store: ObjectId,
        name: String,
        result: ObjectId,
    },
    EnsureTermSet {
        group: ObjectId,
        name: String,
        lcid: u32,
        result: ObjectId,
    },
    EnsureTerm {
        parent: ObjectId,
        name: String,
        lcid: u32,
        result: ObjectId,
    },
    /// Create a custom action; its fields follow as `SetField` on `result`.
    AddCustomAction { actions: ObjectId, result: ObjectId },
}

impl Action {
    /// Handle that receives this action's response payload, if any.
    pub fn result_target(&self) -> Option<ObjectId> {
        match self {
            Action::Load { target, .. } | Action::Query { target } => Some(*target),
            Action::CreateItem { result, .. }
            | Action::AddNavigationNode { result, .. }
            | Action::AddFile { result, .. }
            | Action::EnsureTermGroup { result, .. }
            | Action::EnsureTermSet { result, .. }
            | Action::EnsureTerm { result, .. }
            | Action::AddCustomAction { result, .. } => Some(*result),
            _ => None,
        }
    }
}

/// Positional response for one action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// Action completed without payload.
    Done,
    /// Scalar properties of the addressed object.
    Properties(PropertyMap),
    /// Resolved members of a collection, one property map each.
    Items(Vec<PropertyMap>),
}

/// One round trip's worth of results, aligned with the request's actions.
#[derive(Debug, Clone, Default)]
pub struct BatchResponse {
    pub results: Vec<ActionResult>,
}

impl BatchResponse {
    pub fn new(results: Vec<ActionResult>) -> Self {
        Self { results }
    }

    /// Response for a batch where no action carries a payload.
    pub fn all_done(count: usize) -> Self {
        Self {
            results: vec![ActionResult::Done; count],
        }
    }
}
