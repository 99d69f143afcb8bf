//! Search tools that models can use.

mod collection;
mod document;
mod query;

pub use collection::CreateCollectionTool;
pub use document::{DeleteDocumentTool, UpsertDocumentTool};
pub use query::{QueryTool, SimpleTextQueryTool};
