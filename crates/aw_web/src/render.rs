//! Node builders for search results and article cards.

use aw_core::format::{excerpt, format_date, prefix_with_ellipsis, DateFormat};
use aw_core::{Article, Document, Element, NodeId};

pub const RESULT_PREFIX_LEN: usize = 100;
pub const CARD_EXCERPT_LEN: usize = 150;
pub const HIDDEN_CLASS: &str = "hidden";
pub const ARTICLE_CARD_CLASS: &str = "article-card";

const RESULT_ROW_CLASSES: &str = "block p-4 hover:bg-gray-50 border-b border-gray-100";
const CARD_CLASSES: &str = "bg-white rounded-lg shadow-md overflow-hidden transition-transform duration-300 hover:shadow-lg hover:-translate-y-1";
const PLACEHOLDER_CLASSES: &str = "w-full h-48 bg-gradient-to-r from-indigo-500 to-purple-600 flex items-center justify-center";
const READ_MORE_CLASSES: &str = "mt-4 inline-flex items-center px-4 py-2 border border-transparent text-sm font-medium rounded-md shadow-sm text-white bg-indigo-600 hover:bg-indigo-700";

/// One clickable search hit: title plus the first 100 characters of content.
pub fn result_row(article: &Article) -> Element {
    Element::new("a")
        .with_attr("href", &article.detail_path())
        .with_class(RESULT_ROW_CLASSES)
        .with_child(
            Element::new("h4")
                .with_class("font-medium text-gray-900")
                .with_text(&article.title),
        )
        .with_child(
            Element::new("p")
                .with_class("text-sm text-gray-500 mt-1")
                .with_text(&prefix_with_ellipsis(&article.content, RESULT_PREFIX_LEN)),
        )
}

pub fn no_results(query: &str) -> Element {
    Element::new("div")
        .with_class("p-4 text-center text-gray-500")
        .with_text(&format!("No results found for \"{}\"", query))
}

/// Replaces the container's content with `articles` (or the empty-result
/// message) and makes it visible.
pub fn render_results<D: Document + ?Sized>(
    document: &mut D,
    container: NodeId,
    query: &str,
    articles: &[Article],
) {
    document.clear_children(container);
    if articles.is_empty() {
        document.append_child(container, no_results(query));
    } else {
        for article in articles {
            document.append_child(container, result_row(article));
        }
    }
    document.remove_class(container, HIDDEN_CLASS);
}

/// Builds a detached summary card. Attaching it is up to the caller.
pub fn article_card(article: &Article, dates: &DateFormat) -> Element {
    let image = match article.image() {
        Some(src) => Element::new("img")
            .with_attr("src", src)
            .with_attr("alt", &article.title)
            .with_class("w-full h-48 object-cover"),
        None => Element::new("div").with_class(PLACEHOLDER_CLASSES).with_child(
            Element::new("span")
                .with_class("text-white text-xl font-semibold")
                .with_text(&article.title),
        ),
    };

    let footer = Element::new("div")
        .with_class("flex items-center justify-between")
        .with_child(
            Element::new("span")
                .with_class("text-sm text-gray-500")
                .with_text(&format_date(&article.created_at, dates)),
        )
        .with_child(
            Element::new("span")
                .with_class("text-sm text-gray-500")
                .with_text(&format!("{} views", article.views)),
        );

    let body = Element::new("div")
        .with_class("p-6")
        .with_child(
            Element::new("h3")
                .with_class("text-xl font-semibold text-gray-900 mb-2")
                .with_text(&article.title),
        )
        .with_child(
            Element::new("p")
                .with_class("text-gray-600 mb-4")
                .with_text(&excerpt(&article.content, CARD_EXCERPT_LEN)),
        )
        .with_child(footer)
        .with_child(
            Element::new("a")
                .with_attr("href", &article.detail_path())
                .with_class(READ_MORE_CLASSES)
                .with_text("Read More"),
        );

    Element::new("div")
        .with_class(CARD_CLASSES)
        .with_class(ARTICLE_CARD_CLASS)
        .with_child(image)
        .with_child(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::{ArticleId, MemoryDocument};

    fn article(content: &str, image_url: Option<&str>) -> Article {
        Article {
            id: ArticleId::Number(42),
            title: "Borrowing <Rules>".to_string(),
            content: content.to_string(),
            image_url: image_url.map(str::to_string),
            created_at: "2024-01-05T09:00:00".to_string(),
            views: 1280,
        }
    }

    fn excerpt_of(card: &Element) -> String {
        card.find_tag("p").map(Element::text_content).unwrap_or_default()
    }

    #[test]
    fn card_excerpt_truncates_at_150_characters() {
        let long = "x".repeat(200);
        let card = article_card(&article(&long, None), &DateFormat::default());
        assert_eq!(excerpt_of(&card), format!("{}...", "x".repeat(150)));

        let short = "y".repeat(100);
        let card = article_card(&article(&short, None), &DateFormat::default());
        assert_eq!(excerpt_of(&card), short);
    }

    #[test]
    fn card_without_image_shows_title_placeholder() {
        let card = article_card(&article("body", None), &DateFormat::default());
        assert!(card.find_tag("img").is_none());
        let placeholder = card.find_tag("span").unwrap();
        assert_eq!(placeholder.text_content(), "Borrowing <Rules>");
        assert!(card.to_html().contains("bg-gradient-to-r"));
    }

    #[test]
    fn card_with_image_uses_img_tag() {
        let card = article_card(
            &article("body", Some("https://cdn.example.org/a.png")),
            &DateFormat::default(),
        );
        let img = card.find_tag("img").unwrap();
        assert_eq!(img.attr("src"), Some("https://cdn.example.org/a.png"));
        assert_eq!(img.attr("alt"), Some("Borrowing <Rules>"));
        assert!(!card.to_html().contains("bg-gradient-to-r"));
    }

    #[test]
    fn card_footer_and_link() {
        let card = article_card(&article("body", None), &DateFormat::default());
        assert!(card.has_class(ARTICLE_CARD_CLASS));
        let text = card.text_content();
        assert!(text.contains("January 5, 2024"));
        assert!(text.contains("1280 views"));

        let html = card.to_html();
        assert!(html.contains(r#"href="/articles/42""#));
        assert!(html.contains("Read More"));
        assert!(html.contains("Borrowing &lt;Rules&gt;"));
    }

    #[test]
    fn result_row_prefixes_content() {
        let content = "word ".repeat(40);
        let row = result_row(&article(&content, None));
        assert_eq!(row.attr("href"), Some("/articles/42"));
        let prefix = row.find_tag("p").unwrap().text_content();
        assert_eq!(prefix, format!("{}...", &content[..100]));
    }

    #[test]
    fn render_results_replaces_previous_content() {
        let mut document = MemoryDocument::with_elements([Element::new("div")
            .with_id("search-results")
            .with_class(HIDDEN_CLASS)
            .with_text("stale")]);
        let results = document.get_element_by_id("search-results").unwrap();

        render_results(&mut document, results, "cat", &[]);
        assert_eq!(document.text_content(results), "No results found for \"cat\"");
        assert!(!document.has_class(results, HIDDEN_CLASS));

        let hits = vec![article("first", None), article("second", None)];
        render_results(&mut document, results, "cat", &hits);
        assert_eq!(document.children(results).len(), 2);
        assert!(!document.text_content(results).contains("No results"));
    }
}
