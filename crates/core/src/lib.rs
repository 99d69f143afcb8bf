//! Core building blocks for declaring agents: model roles, tools, toolsets
//! and stdio tool servers.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod models;
pub mod server;
pub mod tool;

pub use agent::{Agent, AgentBuilder};
