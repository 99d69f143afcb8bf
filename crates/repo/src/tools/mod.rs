//! Repository tools that models can use.

mod explain;
mod modify;
mod search;
mod task;

pub use explain::ExplainCodeTool;
pub use modify::ModifyCodeTool;
pub use search::SearchRepositoryTool;
pub use task::ExecuteTaskTool;
