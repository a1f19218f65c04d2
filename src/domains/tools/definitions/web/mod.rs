//! Network tools.

pub mod fetch;

pub use fetch::{WebFetchParams, WebFetchTool};
