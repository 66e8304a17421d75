pub mod config;
pub mod dom;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;

pub use config::SiteConfig;
pub use dom::{Document, Element, MemoryDocument, Node, NodeId};
pub use error::Error;
pub use types::{Article, ArticleId};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::dom::{Document, Element, MemoryDocument, NodeId};
    pub use crate::types::Article;
    pub use crate::{Error, Result, SiteConfig};
}
