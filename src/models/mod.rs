//! Data contracts consumed from the upstream topic service.

mod content;
mod snapshot;

pub use content::{NodeContentMap, NodeRecord, CONTENT_PLACEHOLDER, NO_CONVERSATION_PLACEHOLDER};
pub use snapshot::{GraphSnapshot, Series};
