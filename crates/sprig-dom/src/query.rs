//! Structural queries over element trees.
//!
//! A [`Query`] carries an optional tag-name criterion and any number of
//! attribute criteria. Matching is **disjunctive**: a node matches when at
//! least one criterion holds, not all of them. This mirrors the extraction
//! behavior downstream record mappers were written against; do not tighten
//! it to a conjunction.

/// A criterion value to compare attribute values against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matches only the exact string.
    Exact(String),
    /// The wildcard sentinel: compares equal to any value, so a criterion
    /// `(key, Any)` matches every node that has `key` set at all.
    Any,
}

impl Pattern {
    /// True when `value` satisfies this pattern.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == value,
            Self::Any => true,
        }
    }
}

/// A set of search criteria for [`find_first`] / [`find_all`].
///
/// Criteria combine disjunctively: supplying a tag name and two attribute
/// pairs finds nodes satisfying *any* of the three.
#[derive(Debug, Clone, Default)]
pub struct Query {
    tag_name: Option<String>,
    attributes: Vec<(String, Pattern)>,
}

impl Query {
    /// An empty query. Matches nothing until criteria are added.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tag_name: None,
            attributes: Vec::new(),
        }
    }

    /// Query with a single `class == value` criterion.
    #[must_use]
    pub fn class(value: impl Into<String>) -> Self {
        Self::new().attr("class", value)
    }

    /// Add a tag-name criterion.
    #[must_use]
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tag_name = Some(name.into());
        self
    }

    /// Add an exact attribute criterion.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .push((key.into(), Pattern::Exact(value.into())));
        self
    }

    /// Add a wildcard attribute criterion: matches any node with `key` set,
    /// regardless of value.
    #[must_use]
    pub fn attr_any(mut self, key: impl Into<String>) -> Self {
        self.attributes.push((key.into(), Pattern::Any));
        self
    }

    /// True when the node satisfies at least one criterion.
    #[must_use]
    pub fn is_match<E: Element>(&self, node: &E) -> bool {
        self.match_count(node) > 0
    }

    /// Number of criteria the node satisfies: the tag-name criterion counts
    /// once, each attribute criterion counts once. [`find_all`] reports a
    /// node once per satisfied criterion.
    #[must_use]
    pub fn match_count<E: Element>(&self, node: &E) -> usize {
        let mut hits = 0;
        if let Some(tag) = &self.tag_name
            && node.tag_name() == tag
        {
            hits += 1;
        }
        for (key, pattern) in &self.attributes {
            if node.attribute(key).is_some_and(|value| pattern.matches(value)) {
                hits += 1;
            }
        }
        hits
    }
}

/// The uniform surface the traversal functions operate over: anything with a
/// tag name, attribute lookup, and ordered children can be searched.
pub trait Element: Sized {
    /// The element's tag name.
    fn tag_name(&self) -> &str;
    /// The attribute value for `key`, or `None` if absent.
    fn attribute(&self, key: &str) -> Option<&str>;
    /// The element's children in document order.
    fn children(&self) -> Vec<Self>;
}

/// First element matching `query`, depth-first pre-order: the start node
/// itself, then each child subtree left to right.
pub fn find_first<E: Element + Copy>(node: E, query: &Query) -> Option<E> {
    if query.is_match(&node) {
        return Some(node);
    }
    node.children()
        .into_iter()
        .find_map(|child| find_first(child, query))
}

/// Every element matching `query`, depth-first pre-order. A node appears
/// once per criterion it satisfies, so one matching several criteria is
/// reported several times. Empty when nothing matches, never an error.
pub fn find_all<E: Element + Copy>(node: E, query: &Query) -> Vec<E> {
    let mut results = Vec::new();
    collect(node, query, &mut results);
    results
}

fn collect<E: Element + Copy>(node: E, query: &Query, out: &mut Vec<E>) {
    for _ in 0..query.match_count(&node) {
        out.push(node);
    }
    for child in node.children() {
        collect(child, query, out);
    }
}
