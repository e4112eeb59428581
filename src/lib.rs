//! SharePoint Online client-side object model helpers: a batched request
//! context, a CAML query builder, property bag codecs and the branding,
//! navigation, taxonomy and feature operations built on them.

pub mod api;
pub mod caml;
pub mod cli;
pub mod commands;
pub mod config;
pub mod ops;
pub mod propbag;
pub mod urlutil;
pub mod xmlutil;
