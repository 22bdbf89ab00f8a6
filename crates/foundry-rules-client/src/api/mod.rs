//! API endpoint implementations.

mod actions;
mod objects;

pub use actions::ActionsApi;
pub use objects::{ObjectsApi, SearchQuery};
