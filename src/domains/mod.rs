//! Domains module containing business logic organized by bounded contexts.
//!
//! The server has a single domain today: tools, discovered from manifests
//! and dispatched by name.

pub mod tools;
