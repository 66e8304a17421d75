use scraper::{ElementRef, Html, Selector};

use super::element::{is_raw_text, is_void, set_declaration, write_open_tag, Element, Node};
use super::{Document, NodeId};

#[derive(Debug, Clone)]
enum SlotKind {
    Element {
        tag: String,
        classes: Vec<String>,
        attributes: Vec<(String, String)>,
        styles: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Slot {
    kind: SlotKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Entry {
    generation: u32,
    slot: Option<Slot>,
}

/// Arena-backed document. Removed subtrees return their slots to a free list
/// and bump the slot generation, so the arena stays as large as the biggest
/// tree it held while stale handles stop resolving.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    entries: Vec<Entry>,
    free: Vec<usize>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty document holding only `<body>`.
    pub fn new() -> Self {
        let body = Slot {
            kind: SlotKind::Element {
                tag: "body".to_string(),
                classes: Vec::new(),
                attributes: Vec::new(),
                styles: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            entries: vec![Entry { generation: 0, slot: Some(body) }],
            free: Vec::new(),
        }
    }

    /// Builds a document from an HTML page; the `<body>` contents become the
    /// document body.
    pub fn from_html(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut document = Self::new();
        let body = document.body();
        let root = Selector::parse("body")
            .ok()
            .and_then(|selector| parsed.select(&selector).next())
            .unwrap_or_else(|| parsed.root_element());
        for child in convert_children(root) {
            document.attach(body, child);
        }
        document
    }

    /// Convenience for tests and demos: a body holding `elements`.
    pub fn with_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut document = Self::new();
        let body = document.body();
        for element in elements {
            document.append_child(body, element);
        }
        document
    }

    pub fn to_html(&self) -> String {
        self.inner_html(self.body())
    }

    /// Number of slots allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn slot(&self, node: NodeId) -> Option<&Slot> {
        self.entries
            .get(node.index)
            .filter(|entry| entry.generation == node.generation)
            .and_then(|entry| entry.slot.as_ref())
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Slot> {
        self.entries
            .get_mut(node.index)
            .filter(|entry| entry.generation == node.generation)
            .and_then(|entry| entry.slot.as_mut())
    }

    fn allocate(&mut self, slot: Slot) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.slot = Some(slot);
                NodeId { index, generation: entry.generation }
            }
            None => {
                self.entries.push(Entry { generation: 0, slot: Some(slot) });
                NodeId { index: self.entries.len() - 1, generation: 0 }
            }
        }
    }

    fn attach(&mut self, parent: NodeId, node: Node) -> NodeId {
        let (kind, children) = match node {
            Node::Text(text) => (SlotKind::Text(text), Vec::new()),
            Node::Element(Element { tag, classes, attributes, styles, children }) => {
                (SlotKind::Element { tag, classes, attributes, styles }, children)
            }
        };
        let id = self.allocate(Slot {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(id);
        }
        for child in children {
            self.attach(id, child);
        }
        id
    }

    fn free_subtree(&mut self, node: NodeId) {
        let Some(entry) = self
            .entries
            .get_mut(node.index)
            .filter(|entry| entry.generation == node.generation)
        else {
            return;
        };
        let Some(slot) = entry.slot.take() else {
            return;
        };
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(node.index);
        for child in slot.children {
            self.free_subtree(child);
        }
    }

    /// Attached nodes in document order, starting at the body.
    fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.body()];
        while let Some(node) = stack.pop() {
            order.push(node);
            if let Some(slot) = self.slot(node) {
                stack.extend(slot.children.iter().rev().copied());
            }
        }
        order
    }

    fn classes_mut(&mut self, node: NodeId) -> Option<&mut Vec<String>> {
        match self.slot_mut(node).map(|slot| &mut slot.kind) {
            Some(SlotKind::Element { classes, .. }) => Some(classes),
            _ => None,
        }
    }

    fn write_html(&self, node: NodeId, out: &mut String, raw_text: bool) {
        let Some(slot) = self.slot(node) else {
            return;
        };
        match &slot.kind {
            SlotKind::Text(text) if raw_text => out.push_str(text),
            SlotKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
            SlotKind::Element { tag, classes, attributes, styles } => {
                write_open_tag(out, tag, classes, attributes, styles);
                if is_void(tag) {
                    return;
                }
                for child in &slot.children {
                    self.write_html(*child, out, is_raw_text(tag));
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> NodeId {
        NodeId { index: 0, generation: 0 }
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.walk().into_iter().find(|node| {
            matches!(
                self.slot(*node).map(|slot| &slot.kind),
                Some(SlotKind::Element { attributes, .. })
                    if attributes.iter().any(|(n, v)| n == "id" && v == id)
            )
        })
    }

    fn get_elements_by_class_name(&self, class: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(slot) = self.slot(node) else {
            return String::new();
        };
        match &slot.kind {
            SlotKind::Text(text) => text.clone(),
            SlotKind::Element { .. } => slot
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if self.slot(node).is_some() {
            self.attach(node, Node::Text(text.to_string()));
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = match self.slot_mut(node) {
            Some(slot) => std::mem::take(&mut slot.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    fn append_child(&mut self, parent: NodeId, child: Element) -> NodeId {
        self.attach(parent, Node::Element(child))
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        matches!(
            self.slot(node).map(|slot| &slot.kind),
            Some(SlotKind::Element { classes, .. }) if classes.iter().any(|c| c == class)
        )
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(classes) = self.classes_mut(node) {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(classes) = self.classes_mut(node) {
            classes.retain(|c| c != class);
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(SlotKind::Element { styles, .. }) = self.slot_mut(node).map(|slot| &mut slot.kind) {
            set_declaration(styles, property, value);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        match self.slot(node).map(|slot| &slot.kind) {
            Some(SlotKind::Element { styles, .. }) => styles
                .iter()
                .find(|(p, _)| p == property)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    fn contains(&self, ancestor: NodeId, target: NodeId) -> bool {
        let mut current = Some(target);
        while let Some(node) = current {
            if node == ancestor {
                return self.slot(node).is_some();
            }
            current = self.slot(node).and_then(|slot| slot.parent);
        }
        false
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.slot(node).map(|slot| slot.children.clone()).unwrap_or_default()
    }

    fn inner_html(&self, node: NodeId) -> String {
        let raw_text = matches!(
            self.slot(node).map(|slot| &slot.kind),
            Some(SlotKind::Element { tag, .. }) if is_raw_text(tag)
        );
        let mut out = String::new();
        for child in self.children(node) {
            self.write_html(child, &mut out, raw_text);
        }
        out
    }
}

fn convert_children(element: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in element.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let text: &str = text;
                nodes.push(Node::Text(text.to_string()));
            }
            scraper::Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    nodes.push(Node::Element(convert_element(child)));
                }
            }
            _ => {}
        }
    }
    nodes
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut converted = Element::new(value.name());
    for (name, attr) in value.attrs() {
        converted.set_attr(name, attr);
    }
    for child in convert_children(element) {
        converted = match child {
            Node::Element(inner) => converted.with_child(inner),
            Node::Text(text) => converted.with_text(&text),
        };
    }
    converted
}
