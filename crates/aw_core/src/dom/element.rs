use std::fmt;

const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];
/// Elements whose text is written out without entity encoding
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text_content(&self) -> String {
        match self {
            Node::Element(element) => element.text_content(),
            Node::Text(text) => text.clone(),
        }
    }

    fn write_html(&self, out: &mut String, raw_text: bool) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) if raw_text => out.push_str(text),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
        }
    }
}

/// A detached element tree. Renderers build these; a [`crate::Document`]
/// attaches them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub(crate) tag: String,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) styles: Vec<(String, String)>,
    pub(crate) children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Adds every whitespace-separated class in `classes`.
    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        set_declaration(&mut self.styles, property, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
                return;
            }
            "style" => {
                self.styles = parse_declarations(value);
                return;
            }
            _ => {}
        }
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Depth-first search for the first descendant (or self) with `tag`.
    pub fn find_tag(&self, tag: &str) -> Option<&Element> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(element) => element.find_tag(tag),
            Node::Text(_) => None,
        })
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        write_open_tag(out, &self.tag, &self.classes, &self.attributes, &self.styles);
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        let raw_text = is_raw_text(&self.tag);
        for child in &self.children {
            child.write_html(out, raw_text);
        }
        out.push_str(&format!("</{}>", self.tag));
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_TAGS.contains(&tag)
}

/// Splits an inline `style` value into `(property, value)` pairs.
pub(crate) fn parse_declarations(style: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    for declaration in style.split(';') {
        if let Some((property, value)) = declaration.split_once(':') {
            let property = property.trim();
            if !property.is_empty() {
                set_declaration(&mut declarations, property, value.trim());
            }
        }
    }
    declarations
}

pub(crate) fn set_declaration(styles: &mut Vec<(String, String)>, property: &str, value: &str) {
    match styles.iter_mut().find(|(p, _)| p == property) {
        Some((_, existing)) => *existing = value.to_string(),
        None => styles.push((property.to_string(), value.to_string())),
    }
}

pub(crate) fn write_open_tag(
    out: &mut String,
    tag: &str,
    classes: &[String],
    attributes: &[(String, String)],
    styles: &[(String, String)],
) {
    out.push('<');
    out.push_str(tag);
    if !classes.is_empty() {
        out.push_str(&format!(
            " class=\"{}\"",
            html_escape::encode_double_quoted_attribute(&classes.join(" "))
        ));
    }
    for (name, value) in attributes {
        out.push_str(&format!(
            " {}=\"{}\"",
            name,
            html_escape::encode_double_quoted_attribute(value)
        ));
    }
    if !styles.is_empty() {
        let style = styles
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            " style=\"{}\"",
            html_escape::encode_double_quoted_attribute(&style)
        ));
    }
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_tree() {
        let link = Element::new("a")
            .with_attr("href", "/articles/1")
            .with_class("block p-4")
            .with_child(Element::new("h4").with_text("Title"));
        assert_eq!(
            link.to_html(),
            r#"<a class="block p-4" href="/articles/1"><h4>Title</h4></a>"#
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let img = Element::new("img").with_attr("alt", r#"Say "hi" <b>"#);
        assert_eq!(img.to_html(), r#"<img alt="Say &quot;hi&quot; &lt;b&gt;">"#);

        let p = Element::new("p").with_text(r#"No results found for "a&b""#);
        assert_eq!(p.to_html(), r#"<p>No results found for "a&amp;b"</p>"#);
    }

    #[test]
    fn style_attribute_is_split_into_declarations() {
        let mut div = Element::new("div").with_attr("style", "opacity: 0; color :red;;bogus");
        assert_eq!(
            div.styles(),
            [
                ("opacity".to_string(), "0".to_string()),
                ("color".to_string(), "red".to_string())
            ]
        );
        assert!(div.attr("style").is_none());

        div = div.with_style("animation-delay", "0.1s").with_style("opacity", "1");
        assert_eq!(
            div.to_html(),
            r#"<div style="opacity: 1; color: red; animation-delay: 0.1s;"></div>"#
        );
    }

    #[test]
    fn script_and_style_text_is_not_encoded() {
        let script = Element::new("script").with_text("if (a < b && c) {}");
        assert_eq!(script.to_html(), "<script>if (a < b && c) {}</script>");

        let style = Element::new("style").with_text("a > b { color: red }");
        assert_eq!(style.to_html(), "<style>a > b { color: red }</style>");

        let p = Element::new("p").with_text("a < b");
        assert_eq!(p.to_html(), "<p>a &lt; b</p>");
    }

    #[test]
    fn class_attribute_replaces_class_list() {
        let mut div = Element::new("div").with_class("one two two");
        assert_eq!(div.classes(), ["one", "two"]);
        div.set_attr("class", "three");
        assert!(div.has_class("three"));
        assert!(!div.has_class("one"));
    }
}
