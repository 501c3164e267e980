//! Integration tests for the forest builder.

use sprig_common::warning::warning_count;
use sprig_dom::{Query, Tree};
use sprig_html::{StartCondition, build_forest, build_forest_from_reader};
use std::io::Cursor;

/// Helper to build with the unconditional first-tag start and no ignores.
fn parse(markup: &str) -> Vec<Tree> {
    build_forest(markup, StartCondition::FirstTag, &[])
}

#[test]
fn test_single_tree_with_break_and_child() {
    let forest = parse(r#"<div class="item">Hello<br><span>World</span></div>"#);
    assert_eq!(forest.len(), 1);

    let tree = &forest[0];
    let root = tree.root_node().unwrap();
    assert_eq!(root.tag_name(), "div");
    assert_eq!(root.get("class"), Some("item"));

    // The break tag appends a newline marker instead of resetting the
    // buffer; the span gets its own scope without disturbing the root's.
    assert_eq!(root.text(), Some("Hello\n"));

    let span = tree.find(&Query::new().tag("span")).unwrap();
    assert_eq!(span.text(), Some("World"));

    let br = tree.find(&Query::new().tag("br")).unwrap();
    assert!(br.children().is_empty());
    assert_eq!(br.text(), None);
}

#[test]
fn test_class_condition_segments_forest() {
    let markup = r#"
        <html><body>
        <section class="x"><p>first</p></section>
        <section class="x"><p>second</p></section>
        </body></html>
    "#;
    let forest = build_forest(markup, StartCondition::ClassValue("x".to_string()), &[]);

    assert_eq!(forest.len(), 2);
    for tree in &forest {
        assert_eq!(tree.root_node().unwrap().tag_name(), "section");
        assert!(!tree.is_open());
    }
    assert_eq!(
        forest[0].find(&Query::new().tag("p")).unwrap().text(),
        Some("first")
    );
    assert_eq!(
        forest[1].find(&Query::new().tag("p")).unwrap().text(),
        Some("second")
    );
}

#[test]
fn test_tag_condition_skips_enclosing_tags_shallowly() {
    let markup = "<html><body><article>x</article></body></html>";
    let forest = build_forest(markup, StartCondition::TagName("article".to_string()), &[]);

    assert_eq!(forest.len(), 1);
    let root = forest[0].root_node().unwrap();
    assert_eq!(root.tag_name(), "article");
    assert_eq!(root.text(), Some("x"));
    // The skipped ancestors never became nodes.
    assert!(forest[0].find(&Query::new().tag("body")).is_none());
}

#[test]
fn test_condition_never_matching_yields_empty_forest() {
    let forest = build_forest(
        "<div><p>nothing here</p></div>",
        StartCondition::ClassValue("absent".to_string()),
        &[],
    );
    assert!(forest.is_empty());
}

#[test]
fn test_trailing_whitespace_adds_no_tree() {
    let forest = parse("<p>x</p>   \n  ");
    assert_eq!(forest.len(), 1);
    assert!(!forest[0].is_open());
}

#[test]
fn test_whitespace_only_input_yields_empty_forest() {
    assert!(parse("   \n  ").is_empty());
    assert!(parse("").is_empty());
}

#[test]
fn test_first_tag_mode_segments_adjacent_roots() {
    let forest = parse("<p>a</p><p>b</p>");

    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].root_node().unwrap().text(), Some("a"));
    assert_eq!(forest[1].root_node().unwrap().text(), Some("b"));
}

#[test]
fn test_void_elements_do_not_nest() {
    let forest = parse(r#"<div><img src="i"><hr><p>t</p></div>"#);
    let tree = &forest[0];
    let root = tree.root_node().unwrap();

    let names: Vec<String> = root
        .children()
        .iter()
        .map(|child| child.tag_name().to_string())
        .collect();
    assert_eq!(names, vec!["img", "hr", "p"]);
}

#[test]
fn test_self_closed_tag_behaves_like_void() {
    let forest = parse(r#"<div><widget value="w"/><p>t</p></div>"#);
    let tree = &forest[0];

    let widget = tree.find(&Query::new().tag("widget")).unwrap();
    assert!(widget.children().is_empty());
    assert_eq!(widget.parent().unwrap().tag_name(), "div");
    // The cursor stayed on the div, so the p is its sibling's peer.
    let p = tree.find(&Query::new().tag("p")).unwrap();
    assert_eq!(p.parent().unwrap().tag_name(), "div");
}

#[test]
fn test_ignored_tag_suppresses_whole_subtree() {
    let markup = r#"<div><nav class="menu"><a href="q">L</a></nav><p>ok</p></div>"#;
    let forest = build_forest(markup, StartCondition::FirstTag, &["nav"]);
    let tree = &forest[0];

    assert!(tree.find(&Query::new().tag("nav")).is_none());
    assert!(tree.find(&Query::new().tag("a")).is_none());

    // The cursor never moved: the p is a direct child of the div.
    let p = tree.find(&Query::new().tag("p")).unwrap();
    assert_eq!(p.parent().unwrap().tag_name(), "div");
    assert_eq!(p.text(), Some("ok"));
    assert!(!tree.is_open());
}

#[test]
fn test_ignored_void_tag_is_a_text_boundary() {
    let forest = build_forest("<div>A<img>B</div>", StartCondition::FirstTag, &["img"]);
    let tree = &forest[0];

    assert!(tree.find(&Query::new().tag("img")).is_none());
    assert_eq!(tree.root_node().unwrap().text(), Some("B"));
}

#[test]
fn test_ignored_region_text_does_not_leak() {
    let markup = "<div>A<script>var x = 1;</script>B</div>";
    let forest = build_forest(markup, StartCondition::FirstTag, &["script"]);

    assert_eq!(forest[0].root_node().unwrap().text(), Some("B"));
}

#[test]
fn test_ignored_tag_nests_by_name() {
    let markup = "<div><wrap><wrap><b>deep</b></wrap></wrap><p>after</p></div>";
    let forest = build_forest(markup, StartCondition::FirstTag, &["wrap"]);
    let tree = &forest[0];

    assert!(tree.find(&Query::new().tag("wrap")).is_none());
    assert!(tree.find(&Query::new().tag("b")).is_none());
    assert_eq!(
        tree.find(&Query::new().tag("p")).unwrap().text(),
        Some("after")
    );
    assert!(!tree.is_open());
}

#[test]
fn test_unmatched_close_is_recoverable() {
    let forest = parse("<div>a</div></div><p>z</p>");

    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].root_node().unwrap().tag_name(), "div");
    assert_eq!(forest[1].root_node().unwrap().tag_name(), "p");
    assert!(warning_count() >= 1, "the imbalance is flagged, not raised");
}

#[test]
fn test_unterminated_trailing_tag_keeps_completed_trees() {
    let forest = parse("<div><span>hi</span></div><p");

    assert_eq!(forest.len(), 1);
    assert!(!forest[0].is_open());
    assert_eq!(
        forest[0].find(&Query::new().tag("span")).unwrap().text(),
        Some("hi")
    );
}

#[test]
fn test_unclosed_tree_at_end_is_returned_open() {
    let forest = parse("<div><span>x");

    assert_eq!(forest.len(), 1);
    assert!(forest[0].is_open());
    assert_eq!(forest[0].root_node().unwrap().tag_name(), "div");
}

#[test]
fn test_raw_newlines_never_accumulate() {
    let forest = parse("<p>a\nb\n</p>");
    assert_eq!(forest[0].root_node().unwrap().text(), Some("ab"));
}

#[test]
fn test_parent_text_survives_child_elements() {
    // Each open scope accumulates its own inline fragments: the span gets
    // "B", and the div's fragments around it merge.
    let forest = parse("<div>A<span>B</span>C</div>");
    let tree = &forest[0];

    assert_eq!(tree.find(&Query::new().tag("span")).unwrap().text(), Some("B"));
    assert_eq!(tree.root_node().unwrap().text(), Some("AC"));
}

#[test]
fn test_break_tags_merge_fragments() {
    let forest = parse("<p>one<br>two<br>three</p>");
    assert_eq!(
        forest[0].root_node().unwrap().text(),
        Some("one\ntwo\nthree")
    );
}

#[test]
fn test_empty_text_still_attached_on_close() {
    let forest = parse("<div><p></p></div>");
    let p = forest[0].find(&Query::new().tag("p")).unwrap();
    assert_eq!(p.text(), Some(""));
}

#[test]
fn test_end_tag_attributes_are_ignored() {
    let forest = parse(r#"<div>x</div class="noise">"#);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].root_node().unwrap().get("class"), None);
}

#[test]
fn test_duplicate_attribute_last_wins() {
    let forest = parse(r#"<div id="a" id="b">x</div>"#);
    assert_eq!(forest[0].root_node().unwrap().get("id"), Some("b"));
}

#[test]
fn test_void_tag_as_matching_root() {
    let forest = build_forest(
        r#"<p>skip</p><img src="lone">"#,
        StartCondition::TagName("img".to_string()),
        &[],
    );

    assert_eq!(forest.len(), 1);
    let root = forest[0].root_node().unwrap();
    assert_eq!(root.tag_name(), "img");
    assert!(root.children().is_empty());
    assert!(!forest[0].is_open());
}

#[test]
fn test_build_from_reader() {
    let reader = Cursor::new(b"<p>streamed</p>".to_vec());
    let forest = build_forest_from_reader(reader, StartCondition::FirstTag, &[]).unwrap();

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].root_node().unwrap().text(), Some("streamed"));
}
