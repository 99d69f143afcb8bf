//! Tools that drive an external code assistant CLI inside a repository.
//!
//! Everything here funnels into [`CodeAssistant::invoke`], which runs
//! `<cmd> -p <instruction>` through a shell, in the repository directory,
//! and hands back either parsed JSON or the raw output.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod assistant;
mod operations;
#[cfg(test)]
mod testing;
pub mod tools;

pub use assistant::{
    COMMAND_ENV_VAR, CodeAssistant, DEFAULT_COMMAND, Invocation, Payload,
};
pub use operations::{
    execute_task, explain_code, modify_code, relative_to_repo,
    search_repository,
};
