use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aw_core::{Document, NodeId};
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::client::SearchClient;
use crate::debounce::Debouncer;
use crate::render::{render_results, HIDDEN_CLASS};

/// What a single dispatch did to the results container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query too short: container emptied and hidden, no request made
    Cleared,
    NoResults,
    Rendered(usize),
    /// A newer dispatch was issued while this one was in flight
    Stale,
    /// Request or decoding failed; container left as it was
    Failed,
}

/// Turns the search box value into a backend query and renders the answer.
///
/// Every dispatch takes a fresh sequence number and a response is applied
/// only while its number is still the latest one issued.
pub struct SearchDispatcher<D> {
    document: Arc<RwLock<D>>,
    input: NodeId,
    results: NodeId,
    client: Arc<dyn SearchClient>,
    sequence: Arc<AtomicU64>,
    min_query_len: usize,
}

impl<D> Clone for SearchDispatcher<D> {
    fn clone(&self) -> Self {
        Self {
            document: Arc::clone(&self.document),
            input: self.input,
            results: self.results,
            client: Arc::clone(&self.client),
            sequence: Arc::clone(&self.sequence),
            min_query_len: self.min_query_len,
        }
    }
}

impl<D: Document> SearchDispatcher<D> {
    pub fn new(
        document: Arc<RwLock<D>>,
        input: NodeId,
        results: NodeId,
        client: Arc<dyn SearchClient>,
        min_query_len: usize,
    ) -> Self {
        Self {
            document,
            input,
            results,
            client,
            sequence: Arc::new(AtomicU64::new(0)),
            min_query_len,
        }
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn results(&self) -> NodeId {
        self.results
    }

    pub async fn dispatch(&self, raw_query: &str) -> SearchOutcome {
        let query = raw_query.trim();
        let issued = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        if query.chars().count() < self.min_query_len {
            let mut document = self.document.write().await;
            document.clear_children(self.results);
            document.add_class(self.results, HIDDEN_CLASS);
            return SearchOutcome::Cleared;
        }

        debug!("search #{} for {:?}", issued, query);
        let response = self.client.search(query).await;

        // Checked under the write lock so a newer clear cannot slip in between.
        let mut document = self.document.write().await;
        if self.sequence.load(Ordering::SeqCst) != issued {
            debug!("dropping stale search #{} for {:?}", issued, query);
            return SearchOutcome::Stale;
        }

        match response {
            Ok(articles) => {
                render_results(&mut *document, self.results, query, &articles);
                if articles.is_empty() {
                    SearchOutcome::NoResults
                } else {
                    SearchOutcome::Rendered(articles.len())
                }
            }
            Err(e) => {
                error!("Search error: {}", e);
                SearchOutcome::Failed
            }
        }
    }

    /// Hides the results when `target` is outside both the input and the
    /// results container. Content is kept so it can be shown again.
    pub async fn hide_on_outside_click(&self, target: NodeId) -> bool {
        let mut document = self.document.write().await;
        if document.contains(self.input, target) || document.contains(self.results, target) {
            return false;
        }
        document.add_class(self.results, HIDDEN_CLASS);
        true
    }
}

/// The wired search box: input changes go through a [`Debouncer`] before a
/// dispatch is spawned.
pub struct SearchBox<D> {
    dispatcher: SearchDispatcher<D>,
    debouncer: Debouncer<String>,
}

impl<D: Document + 'static> SearchBox<D> {
    pub fn new(dispatcher: SearchDispatcher<D>, delay: Duration) -> Self {
        let spawner = dispatcher.clone();
        let debouncer = Debouncer::new(delay, move |query: String| {
            let dispatcher = spawner.clone();
            tokio::spawn(async move {
                dispatcher.dispatch(&query).await;
            });
        });
        Self { dispatcher, debouncer }
    }

    pub fn dispatcher(&self) -> &SearchDispatcher<D> {
        &self.dispatcher
    }

    /// Records the latest input value; the search runs once typing pauses.
    pub fn on_input(&self, value: &str) {
        self.debouncer.call(value.to_string());
    }

    pub async fn on_click(&self, target: NodeId) -> bool {
        self.dispatcher.hide_on_outside_click(target).await
    }
}
