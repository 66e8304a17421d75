use async_trait::async_trait;
use aw_core::{Article, Error, Result};
use tracing::debug;
use url::Url;

pub const SEARCH_PATH: &str = "/api/search";

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Returns the articles matching `query`. An empty list means no matches.
    async fn search(&self, query: &str) -> Result<Vec<Article>>;
}

/// Queries `GET {backend}/api/search?q=...`. No timeout is configured, so a
/// request runs until the server answers or the connection fails.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSearchClient {
    pub fn new(backend_url: &Url) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: backend_url.join(SEARCH_PATH)?,
        })
    }

    /// Uses `endpoint` as is, for backends that serve search elsewhere.
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<Article>> {
        let url = self.search_url(query);
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let articles: Vec<Article> = serde_json::from_str(&body)?;
        debug!("{} results for {:?}", articles.len(), query);
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_escaped_search_url() {
        let backend = Url::parse("http://localhost:8000").unwrap();
        let client = HttpSearchClient::new(&backend).unwrap();
        assert_eq!(
            client.search_url("rust & go").as_str(),
            "http://localhost:8000/api/search?q=rust+%26+go"
        );
        assert_eq!(
            client.search_url("café?").as_str(),
            "http://localhost:8000/api/search?q=caf%C3%A9%3F"
        );
    }
}
