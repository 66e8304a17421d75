pub mod client;
pub mod debounce;
pub mod page;
pub mod render;
pub mod search;

pub use client::{HttpSearchClient, SearchClient};
pub use debounce::Debouncer;
pub use page::{Page, PageEvent};
pub use search::{SearchBox, SearchDispatcher, SearchOutcome};

pub mod prelude {
    pub use aw_core::{Article, Document, Error, MemoryDocument, NodeId, Result, SiteConfig};
    pub use crate::{Page, PageEvent, SearchClient};
}
