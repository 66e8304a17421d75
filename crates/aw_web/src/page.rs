//! Page-load wiring: reading time, mobile menu, card stagger and search.
//!
//! Each affordance looks up the elements it needs once, at load. A missing
//! element disables that affordance and nothing else.

use std::sync::Arc;
use std::time::Duration;

use aw_core::format::{reading_time_label, reading_time_minutes};
use aw_core::{Document, NodeId, SiteConfig};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::client::SearchClient;
use crate::render::{ARTICLE_CARD_CLASS, HIDDEN_CLASS};
use crate::search::{SearchBox, SearchDispatcher};

pub const SEARCH_INPUT_ID: &str = "search-input";
pub const SEARCH_RESULTS_ID: &str = "search-results";
pub const MOBILE_MENU_BUTTON_ID: &str = "mobile-menu-button";
pub const MOBILE_MENU_ID: &str = "mobile-menu";
pub const READING_TIME_ID: &str = "reading-time";
pub const ARTICLE_CONTENT_CLASS: &str = "article-content";

/// Browser events the page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// The value of a text input changed
    Input { target: NodeId, value: String },
    Click { target: NodeId },
}

/// Writes `N min read` into `#reading-time` from the `.article-content` text.
/// Returns the minutes shown, or `None` when either element is missing.
pub fn show_reading_time<D: Document + ?Sized>(document: &mut D, words_per_minute: usize) -> Option<usize> {
    let content = document.first_by_class_name(ARTICLE_CONTENT_CLASS)?;
    let output = document.get_element_by_id(READING_TIME_ID)?;
    let minutes = reading_time_minutes(&document.text_content(content), words_per_minute);
    document.set_text_content(output, &reading_time_label(minutes));
    Some(minutes)
}

/// Gives every `.article-card` an animation delay of `index * step`.
pub fn stagger_cards<D: Document + ?Sized>(document: &mut D, step: Duration) -> usize {
    let cards = document.get_elements_by_class_name(ARTICLE_CARD_CLASS);
    for (index, card) in cards.iter().enumerate() {
        document.set_style(*card, "animation-delay", &animation_delay(step, index));
    }
    cards.len()
}

fn animation_delay(step: Duration, index: usize) -> String {
    let millis = step.as_millis() * index as u128;
    format!("{}s", millis as f64 / 1000.0)
}

#[derive(Debug, Clone, Copy)]
struct MobileMenu {
    button: NodeId,
    menu: NodeId,
}

impl MobileMenu {
    fn find<D: Document + ?Sized>(document: &D) -> Option<Self> {
        Some(Self {
            button: document.get_element_by_id(MOBILE_MENU_BUTTON_ID)?,
            menu: document.get_element_by_id(MOBILE_MENU_ID)?,
        })
    }
}

/// A loaded page with its listeners registered.
pub struct Page<D> {
    document: Arc<RwLock<D>>,
    search: Option<SearchBox<D>>,
    menu: Option<MobileMenu>,
}

impl<D: Document + 'static> Page<D> {
    /// Runs the page-load setup once.
    pub async fn load(document: Arc<RwLock<D>>, client: Arc<dyn SearchClient>, config: &SiteConfig) -> Self {
        let (search_elements, menu) = {
            let mut doc = document.write().await;
            match show_reading_time(&mut *doc, config.words_per_minute) {
                Some(minutes) => debug!("reading time: {} min", minutes),
                None => debug!("no article content on this page"),
            }
            let cards = stagger_cards(&mut *doc, config.stagger_step);
            debug!("staggered {} article cards", cards);

            let search_elements = doc
                .get_element_by_id(SEARCH_INPUT_ID)
                .zip(doc.get_element_by_id(SEARCH_RESULTS_ID));
            (search_elements, MobileMenu::find(&*doc))
        };

        let search = search_elements.map(|(input, results)| {
            let dispatcher = SearchDispatcher::new(
                Arc::clone(&document),
                input,
                results,
                client,
                config.min_query_len,
            );
            SearchBox::new(dispatcher, config.debounce)
        });

        info!(
            "page loaded (search: {}, mobile menu: {})",
            if search.is_some() { "on" } else { "off" },
            if menu.is_some() { "on" } else { "off" }
        );

        Self { document, search, menu }
    }

    pub fn document(&self) -> &Arc<RwLock<D>> {
        &self.document
    }

    pub fn search(&self) -> Option<&SearchBox<D>> {
        self.search.as_ref()
    }

    pub async fn dispatch(&self, event: PageEvent) {
        match event {
            PageEvent::Input { target, value } => {
                if let Some(search) = self.search.as_ref().filter(|s| s.dispatcher().input() == target) {
                    search.on_input(&value);
                }
            }
            PageEvent::Click { target } => {
                if let Some(menu) = self.menu {
                    let mut document = self.document.write().await;
                    if document.contains(menu.button, target) {
                        document.toggle_class(menu.menu, HIDDEN_CLASS);
                    }
                }
                if let Some(search) = &self.search {
                    search.on_click(target).await;
                }
            }
        }
    }
}
