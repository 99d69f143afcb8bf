//! The agents assembled from the workspace crates.
//!
//! Three agents are declared here: one that drives the GitHub MCP server, one
//! for document search and one for working inside a code repository. The
//! crate also ships a CLI for listing the agents, calling their tools by hand
//! and checking that the external services they need are reachable.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod agents;
pub mod checks;
mod github;

pub use github::{GITHUB_SERVER_IMAGE, GithubServerConfig};

/// Re-exports of [`agentry_core`] crate.
pub mod core {
    pub use agentry_core::*;
}
