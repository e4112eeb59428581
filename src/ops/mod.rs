//! High-level operations against a site, one module per concern.
//!
//! Each function takes the [`crate::api::ClientContext`] by reference and a
//! handle to the web it works on; nothing here holds state of its own.

pub mod branding;
pub mod features;
pub mod navigation;
pub mod propertybag;
pub mod taxonomy;
