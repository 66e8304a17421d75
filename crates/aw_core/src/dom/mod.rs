//! The page the scripts operate on.
//!
//! Everything the page layer reads or changes goes through [`Document`], so a
//! browser binding and the in-memory [`MemoryDocument`] are interchangeable.

mod element;
mod memory;

pub use element::{Element, Node};
pub use memory::MemoryDocument;

/// Handle to a node attached to (or once attached to) a document.
///
/// The generation tells apart two nodes that lived in the same slot, so a
/// handle to a removed node never resolves to its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

pub trait Document: Send + Sync {
    /// The root every lookup starts from
    fn body(&self) -> NodeId;

    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Attached elements carrying `class`, in document order
    fn get_elements_by_class_name(&self, class: &str) -> Vec<NodeId>;

    fn first_by_class_name(&self, class: &str) -> Option<NodeId> {
        self.get_elements_by_class_name(class).into_iter().next()
    }

    /// Concatenated text of the node and its descendants
    fn text_content(&self, node: NodeId) -> String;

    /// Replaces all children with a single text node
    fn set_text_content(&mut self, node: NodeId, text: &str);

    fn clear_children(&mut self, node: NodeId);

    /// Attaches a detached tree as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, child: Element) -> NodeId;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Returns whether the class is present afterwards
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// True when `target` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: NodeId, target: NodeId) -> bool;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn inner_html(&self, node: NodeId) -> String;
}
