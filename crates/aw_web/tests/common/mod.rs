#![allow(dead_code)]

use async_trait::async_trait;
use aw_core::{Article, ArticleId, Element, Error, MemoryDocument, Result};
use aw_web::SearchClient;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub enum Reply {
    Articles(Vec<Article>),
    Fail,
}

/// Canned search backend that records every query it receives.
pub struct FakeSearchClient {
    replies: HashMap<String, (Duration, Reply)>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearchClient {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, query: &str, articles: Vec<Article>) -> Self {
        self.replies.insert(query.to_string(), (Duration::ZERO, Reply::Articles(articles)));
        self
    }

    pub fn slow_reply(mut self, query: &str, delay: Duration, articles: Vec<Article>) -> Self {
        self.replies.insert(query.to_string(), (delay, Reply::Articles(articles)));
        self
    }

    pub fn fail(mut self, query: &str) -> Self {
        self.replies.insert(query.to_string(), (Duration::ZERO, Reply::Fail));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for FakeSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<Article>> {
        self.queries.lock().unwrap().push(query.to_string());
        let (delay, reply) = self
            .replies
            .get(query)
            .ok_or_else(|| Error::Config(format!("unexpected query {:?}", query)))?;
        if !delay.is_zero() {
            tokio::time::sleep(*delay).await;
        }
        match reply {
            Reply::Articles(articles) => Ok(articles.clone()),
            Reply::Fail => Err(Error::External(anyhow::anyhow!("connection reset"))),
        }
    }
}

pub fn article(id: i64, title: &str) -> Article {
    Article {
        id: ArticleId::Number(id),
        title: title.to_string(),
        content: format!("{} is a long story about {}", title, "cats ".repeat(30)),
        image_url: None,
        created_at: "2024-02-10T08:00:00".to_string(),
        views: id as u64 * 10,
    }
}

/// A page with the search box, a results container and an unrelated header.
pub fn search_page() -> MemoryDocument {
    MemoryDocument::with_elements([
        Element::new("header")
            .with_id("site-header")
            .with_child(Element::new("h1").with_text("Articles")),
        Element::new("input").with_id("search-input"),
        Element::new("div").with_id("search-results").with_class("hidden"),
    ])
}
