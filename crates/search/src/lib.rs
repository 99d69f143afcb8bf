//! Document-search operations over an OpenSearch-compatible REST API.
//!
//! Every operation opens a fresh [`SearchClient`] and performs its own
//! existence checks against the cluster; nothing is cached locally.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod client;
mod config;
mod results;
pub mod tools;

pub use client::SearchClient;
pub use config::{ConfigSource, SearchConfig};
pub use results::{Hit, QueryResults, text_query};
