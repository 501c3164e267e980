//! Element tree for the Sprig scraping parser.
//!
//! One [`Tree`] is a rooted, ordered structure of elements built from a
//! contiguous matched region of markup; one scan of a page can produce many
//! of them (a *forest*). Trees are grown by the builder in `sprig-html` and
//! are read-only afterwards: callers only ever query them.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. The construction cursor ("the node currently receiving children")
//! is an index too, so closing a tag is a single index move to the parent.

use std::collections::HashMap;

pub mod query;

pub use query::{Element, Pattern, Query, find_all, find_first};

/// Map of attribute names to values for an element.
///
/// May contain the reserved key `"text"`, holding the inline text accumulated
/// for that element while it was open.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into a [`Tree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A single element in the tree: a tag name, its attributes, and index links
/// to its parent and children.
///
/// `children` is absent (`None`), not merely empty, until the first child is
/// added; callers must not assume an empty sequence exists before first
/// insertion. `parent` is a non-owning back-reference used only to move the
/// construction cursor when a tag closes.
#[derive(Debug, Clone)]
pub struct Node {
    /// The markup tag name, byte-exact as scanned.
    pub tag_name: String,
    /// Attribute map, including the reserved `"text"` key once the element
    /// has closed.
    pub attributes: AttributesMap,
    /// Enclosing element, or `None` for a root.
    pub parent: Option<NodeId>,
    /// Ordered child elements; `None` until the first child is added.
    pub children: Option<Vec<NodeId>>,
}

/// One rooted, ordered tree of elements.
///
/// While being built the tree is "open": `cursor` points at the node
/// currently receiving children and text. Once every opened scope has closed,
/// `cursor` returns to `None` and the tree is complete.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// All nodes of this tree; the root, when set, is always at index 0.
    nodes: Vec<Node>,
    root: Option<NodeId>,
    cursor: Option<NodeId>,
}

impl Tree {
    /// Create an empty tree with no root and no open scope.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            cursor: None,
        }
    }

    /// True while the tree is still being built: either no root has been set
    /// yet, or some opened scope has not closed. False exactly once per
    /// completed tree.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.cursor.is_some() || self.root.is_none()
    }

    /// The root node id, or `None` before construction starts.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The node currently receiving children and text, or `None` once the
    /// tree has fully closed.
    #[must_use]
    pub const fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by its id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a read handle for a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|_| NodeRef { tree: self, id })
    }

    /// Read handle for the root, or `None` before construction starts.
    #[must_use]
    pub fn root_node(&self) -> Option<NodeRef<'_>> {
        self.root.and_then(|id| self.node(id))
    }

    /// Child ids of a node, empty when the node has none (or does not exist).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(|n| n.children.as_deref())
            .unwrap_or(&[])
    }

    /// Parent id of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Open a new element under the cursor and move the cursor into it.
    ///
    /// The first node opened becomes the root.
    pub fn open_node(&mut self, tag_name: String, attributes: AttributesMap) -> NodeId {
        let id = self.alloc(tag_name, attributes);
        if self.root.is_none() {
            self.root = Some(id);
        }
        self.cursor = Some(id);
        id
    }

    /// Append a void element under the cursor without moving the cursor.
    ///
    /// A void element opened as the very first node becomes a root that is
    /// already closed: the tree completes as a single node.
    pub fn append_void(&mut self, tag_name: String, attributes: AttributesMap) -> NodeId {
        let id = self.alloc(tag_name, attributes);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Set the `"text"` attribute on the cursor node, overwriting any prior
    /// value. No effect when no scope is open.
    pub fn attach_text(&mut self, text: String) {
        if let Some(id) = self.cursor {
            let _ = self.nodes[id.0].attributes.insert("text".to_string(), text);
        }
    }

    /// Close the current scope: move the cursor to the parent of the cursor
    /// node (`None` once the root itself closes). No effect when no scope is
    /// open.
    pub fn close_node(&mut self) {
        self.cursor = self.cursor.and_then(|id| self.nodes[id.0].parent);
    }

    /// First node matching `query`, depth-first pre-order from the root.
    #[must_use]
    pub fn find(&self, query: &Query) -> Option<NodeRef<'_>> {
        self.root_node().and_then(|root| find_first(root, query))
    }

    /// Every node matching `query`, depth-first pre-order from the root.
    /// Empty when nothing matches (or the tree has no root), never an error.
    #[must_use]
    pub fn find_all(&self, query: &Query) -> Vec<NodeRef<'_>> {
        self.root_node()
            .map_or_else(Vec::new, |root| find_all(root, query))
    }

    /// First node whose `class` attribute equals `class`.
    #[must_use]
    pub fn find_class(&self, class: &str) -> Option<NodeRef<'_>> {
        self.find(&Query::class(class))
    }

    /// Every node whose `class` attribute equals `class`.
    #[must_use]
    pub fn find_all_class(&self, class: &str) -> Vec<NodeRef<'_>> {
        self.find_all(&Query::class(class))
    }

    fn alloc(&mut self, tag_name: String, attributes: AttributesMap) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag_name,
            attributes,
            parent: self.cursor,
            children: None,
        });
        if let Some(parent) = self.cursor {
            self.nodes[parent.0]
                .children
                .get_or_insert_with(Vec::new)
                .push(id);
        }
        id
    }
}

/// Copyable read handle to one node of a [`Tree`].
///
/// This is the unit the query engine traverses and the value it returns;
/// downstream record-mapping code pulls scalar strings out of it with
/// [`NodeRef::get`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The id of this node within its tree.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this handle points into.
    #[must_use]
    pub const fn tree(&self) -> &'a Tree {
        self.tree
    }

    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    /// The element's tag name.
    #[must_use]
    pub fn tag_name(&self) -> &'a str {
        &self.node().tag_name
    }

    /// The attribute value for `key`, or `None` if absent. Never fails;
    /// an absent attribute is a normal outcome.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.node().attributes.get(key).map(String::as_str)
    }

    /// The inline text attached to this element, if any. Sugar for
    /// `get("text")`.
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        self.get("text")
    }

    /// The full attribute map.
    #[must_use]
    pub fn attributes(&self) -> &'a AttributesMap {
        &self.node().attributes
    }

    /// The enclosing element, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Ordered child handles; empty when no child was ever added.
    #[must_use]
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&id| NodeRef {
                tree: self.tree,
                id,
            })
            .collect()
    }

    /// First node matching `query` in the subtree rooted here, depth-first
    /// pre-order (self first).
    #[must_use]
    pub fn find(&self, query: &Query) -> Option<NodeRef<'a>> {
        find_first(*self, query)
    }

    /// Every node matching `query` in the subtree rooted here, depth-first
    /// pre-order.
    #[must_use]
    pub fn find_all(&self, query: &Query) -> Vec<NodeRef<'a>> {
        find_all(*self, query)
    }

    /// First node in this subtree whose `class` attribute equals `class`.
    #[must_use]
    pub fn find_class(&self, class: &str) -> Option<NodeRef<'a>> {
        self.find(&Query::class(class))
    }

    /// Every node in this subtree whose `class` attribute equals `class`.
    #[must_use]
    pub fn find_all_class(&self, class: &str) -> Vec<NodeRef<'a>> {
        self.find_all(&Query::class(class))
    }
}

impl Element for NodeRef<'_> {
    fn tag_name(&self) -> &str {
        NodeRef::tag_name(self)
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key)
    }

    fn children(&self) -> Vec<Self> {
        NodeRef::children(self)
    }
}

/// Print a tree to stdout for debugging. With `deep`, attributes are printed
/// under each node.
pub fn print_tree(tree: &Tree, deep: bool) {
    if let Some(root) = tree.root_node() {
        print_node(root, 0, deep);
    }
}

fn print_node(node: NodeRef<'_>, level: usize, deep: bool) {
    let indent = "    ".repeat(level);
    println!("{indent}{}, level {level}", node.tag_name());
    if deep {
        for (key, value) in node.attributes() {
            println!("{indent} ::{key} = {value}");
        }
    }
    for child in node.children() {
        print_node(child, level + 1, deep);
    }
}
