//! Integration tests for the element tree and the query engine.

use sprig_dom::{AttributesMap, Query, Tree};

/// Helper to build an attribute map from literal pairs.
fn attrs(pairs: &[(&str, &str)]) -> AttributesMap {
    pairs
        .iter()
        .map(|&(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Build the sample tree used by most query tests:
///
/// ```text
/// div(class="top")
/// ├── a(href="one")
/// ├── span(class="x") -- text "mid"
/// │   └── a(class="x", href="two")
/// └── b
/// ```
fn sample_tree() -> Tree {
    let mut tree = Tree::new();
    let _ = tree.open_node("div".to_string(), attrs(&[("class", "top")]));
    let _ = tree.append_void("a".to_string(), attrs(&[("href", "one")]));
    let _ = tree.open_node("span".to_string(), attrs(&[("class", "x")]));
    let _ = tree.append_void("a".to_string(), attrs(&[("class", "x"), ("href", "two")]));
    tree.attach_text("mid".to_string());
    tree.close_node();
    let _ = tree.append_void("b".to_string(), AttributesMap::new());
    tree.close_node();
    tree
}

#[test]
fn test_open_close_lifecycle() {
    let mut tree = Tree::new();
    assert!(tree.is_open(), "a tree with no root counts as open");

    let root = tree.open_node("div".to_string(), AttributesMap::new());
    assert!(tree.is_open());
    assert_eq!(tree.root(), Some(root));
    assert_eq!(tree.cursor(), Some(root));

    tree.close_node();
    assert!(!tree.is_open());
    assert_eq!(tree.cursor(), None);
}

#[test]
fn test_children_absent_until_first_insertion() {
    let mut tree = Tree::new();
    let root = tree.open_node("div".to_string(), AttributesMap::new());
    assert!(
        tree.get(root).unwrap().children.is_none(),
        "no child sequence exists before the first child is added"
    );

    let _ = tree.append_void("br".to_string(), AttributesMap::new());
    assert_eq!(tree.get(root).unwrap().children.as_ref().unwrap().len(), 1);
}

#[test]
fn test_void_node_keeps_cursor() {
    let mut tree = Tree::new();
    let root = tree.open_node("div".to_string(), AttributesMap::new());
    let img = tree.append_void("img".to_string(), AttributesMap::new());

    assert_eq!(tree.cursor(), Some(root));
    assert_eq!(tree.parent(img), Some(root));
    assert!(tree.children(img).is_empty());
}

#[test]
fn test_void_root_completes_tree() {
    let mut tree = Tree::new();
    let root = tree.append_void("br".to_string(), AttributesMap::new());

    assert_eq!(tree.root(), Some(root));
    assert!(!tree.is_open());
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_get_absent_attribute_is_none() {
    let tree = sample_tree();
    let root = tree.root_node().unwrap();

    assert_eq!(root.get("class"), Some("top"));
    assert_eq!(root.get("href"), None);
    assert_eq!(root.text(), None);
}

#[test]
fn test_attach_text_overwrites() {
    let mut tree = Tree::new();
    let _ = tree.open_node("p".to_string(), attrs(&[("text", "from markup")]));
    tree.attach_text("real".to_string());
    tree.close_node();

    assert_eq!(tree.root_node().unwrap().text(), Some("real"));
}

#[test]
fn test_find_first_in_pre_order() {
    let tree = sample_tree();
    let found = tree.find(&Query::new().tag("a")).unwrap();

    // The direct child comes before the nested one.
    assert_eq!(found.get("href"), Some("one"));
}

#[test]
fn test_find_all_in_pre_order() {
    let tree = sample_tree();
    let found = tree.find_all(&Query::new().tag("a"));

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].get("href"), Some("one"));
    assert_eq!(found[1].get("href"), Some("two"));
}

#[test]
fn test_find_is_disjunctive_across_criteria() {
    let tree = sample_tree();
    // Tag b OR class "top": two different nodes satisfy one criterion each.
    let found = tree.find_all(&Query::new().tag("b").attr("class", "top"));

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].tag_name(), "div");
    assert_eq!(found[1].tag_name(), "b");
}

#[test]
fn test_find_all_reports_node_once_per_matching_criterion() {
    let tree = sample_tree();
    // The nested a has tag "a" AND class "x": reported twice. The span and
    // the direct a each match one criterion.
    let found = tree.find_all(&Query::new().tag("a").attr("class", "x"));

    assert_eq!(found.len(), 4);
    let tags: Vec<&str> = found.iter().map(|node| node.tag_name()).collect();
    assert_eq!(tags, vec!["a", "span", "a", "a"]);
}

#[test]
fn test_wildcard_matches_any_value() {
    let tree = sample_tree();
    let found = tree.find_all(&Query::new().attr_any("href"));

    assert_eq!(found.len(), 2);

    // Only the span had text attached; voids never do.
    let with_text = tree.find_all(&Query::new().attr_any("text"));
    assert_eq!(with_text.len(), 1);
    assert_eq!(with_text[0].tag_name(), "span");
}

#[test]
fn test_empty_query_matches_nothing() {
    let tree = sample_tree();
    assert!(tree.find(&Query::new()).is_none());
    assert!(tree.find_all(&Query::new()).is_empty());
}

#[test]
fn test_find_class_sugar() {
    let tree = sample_tree();
    let first = tree.find_class("x").unwrap();
    assert_eq!(first.tag_name(), "span");

    let all = tree.find_all_class("x");
    assert_eq!(all.len(), 2);
}

#[test]
fn test_find_on_unrooted_tree() {
    let tree = Tree::new();
    assert!(tree.find(&Query::new().tag("div")).is_none());
    assert!(tree.find_all(&Query::new().tag("div")).is_empty());
}

#[test]
fn test_subtree_search_from_node() {
    let tree = sample_tree();
    let span = tree.find(&Query::new().tag("span")).unwrap();

    let nested = span.find(&Query::new().tag("a")).unwrap();
    assert_eq!(nested.get("href"), Some("two"));

    // Pre-order includes the start node itself.
    assert_eq!(span.find(&Query::class("x")).unwrap().id(), span.id());
}

#[test]
fn test_parent_links() {
    let tree = sample_tree();
    let nested = tree.find(&Query::new().attr("href", "two")).unwrap();

    let parent = nested.parent().unwrap();
    assert_eq!(parent.tag_name(), "span");
    assert_eq!(parent.parent().unwrap().tag_name(), "div");
    assert!(tree.root_node().unwrap().parent().is_none());
}
