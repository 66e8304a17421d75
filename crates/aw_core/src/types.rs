use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque article identifier. The backend may send it as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(n) => write!(f, "{}", n),
            ArticleId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ArticleId {
    fn from(id: i64) -> Self {
        ArticleId::Number(id)
    }
}

impl From<&str> for ArticleId {
    fn from(id: &str) -> Self {
        ArticleId::Text(id.to_string())
    }
}

/// An article as returned by the listing and search endpoints.
///
/// This layer only reads articles; it never builds or modifies one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub views: u64,
}

impl Article {
    /// Link to the article detail page.
    pub fn detail_path(&self) -> String {
        format!("/articles/{}", self.id)
    }

    /// The image URL, treating an empty string the same as a missing one.
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}
