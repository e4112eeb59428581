//! SharePoint remote object mutation client.
//!
//! Implements the batched load/mutate/flush protocol the ops modules are
//! built on: an object table of entity handles, a pending-action queue, and
//! a transport seam that ships one XML batch per round trip.

pub mod auth;
pub mod client;
pub mod constants;
pub mod context;
pub mod entity;
pub mod error;
pub mod operations;
pub mod transport;

pub use auth::{CredentialSet, TokenInfo, authenticate};
pub use client::build_http_client;
pub use context::ClientContext;
pub use entity::{
    FeatureScope, FieldValue, FileCreation, NavigationKind, NavigationNodeCreation, ObjectId,
    ObjectKind, ObjectPath, PropertyMap,
};
pub use error::{LocalInputFault, RemoteFault};
pub use operations::{Action, ActionResult, BatchResponse};
pub use transport::{HttpTransport, Transport};
