//! Shared test transport: scripted responses in, recorded batches out.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use spo_cli::api::{
    Action, ActionResult, BatchResponse, ObjectId, ObjectPath, PropertyMap, RemoteFault, Transport,
};

/// Transport that answers from a queue of scripted responses and records
/// every batch it receives. When the queue runs dry, each remaining batch is
/// acknowledged with one `Done` per action, which suits mutation-only flushes.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<BatchResponse, RemoteFault>>>,
    calls: Arc<Mutex<Vec<Vec<Action>>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, response: BatchResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_fault(&self, fault: RemoteFault) {
        self.responses.lock().unwrap().push_back(Err(fault));
    }

    /// Handle onto the recorded batches; clone before boxing the transport.
    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<Action>>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute_batch(
        &self,
        _site_url: &str,
        _paths: &[(ObjectId, ObjectPath)],
        actions: &[Action],
    ) -> Result<BatchResponse, RemoteFault> {
        self.calls.lock().unwrap().push(actions.to_vec());
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(BatchResponse::all_done(actions.len())),
        }
    }
}

/// Build a property map from string keys and JSON values.
pub fn props(entries: &[(&str, serde_json::Value)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// A single-property string map, the common case for `Load` responses.
pub fn string_props(entries: &[(&str, &str)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

/// Response carrying one `Properties` payload.
pub fn properties_response(map: PropertyMap) -> BatchResponse {
    BatchResponse::new(vec![ActionResult::Properties(map)])
}

/// Response carrying one `Items` payload.
pub fn items_response(items: Vec<PropertyMap>) -> BatchResponse {
    BatchResponse::new(vec![ActionResult::Items(items)])
}
