//! Command handlers wired up by `main`; one module per CLI command group.

pub mod auth;
pub mod branding;
pub mod features;
pub mod navigation;
pub mod propertybag;
pub mod taxonomy;
