//! Webswags Core Library
//!
//! This library discovers OpenAPI 3.x and Swagger 2.0 documents scattered
//! under a project tree and normalizes them into version-agnostic
//! [`SpecDocument`] records, sorted by service name.

pub mod config;
pub mod discovery;
pub mod error;
pub mod format;
pub mod naming;
pub mod schema;
pub mod spec;

pub use crate::{
    config::Config,
    discovery::{discover, discover_async, Discovery},
    error::{Error, Result},
    format::Format,
    naming::derive_name,
    spec::{Info, SchemaKind, SpecDocument, SpecView},
};
