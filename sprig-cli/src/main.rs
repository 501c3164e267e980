//! Sprig CLI
//!
//! A debugging surface for the scraping parser: fetch or read a page, build
//! the forest, and inspect it as an indented tree view, as JSON, or through
//! a class query.

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::Value;
use sprig_dom::{NodeRef, print_tree};
use sprig_html::{StartCondition, build_forest};
use std::fs;

#[derive(Parser)]
#[command(name = "sprig", about = "Build and inspect element trees from markup", version)]
struct Args {
    /// File path or http(s) URL to read markup from
    source: String,

    /// Only start trees under a tag with this exact name
    #[arg(long, value_name = "TAG", conflicts_with = "below_class")]
    below_tag: Option<String>,

    /// Only start trees under a tag whose class attribute equals this value
    #[arg(long, value_name = "VALUE")]
    below_class: Option<String>,

    /// Drop this tag (and everything nested inside it); repeatable
    #[arg(long = "ignore", value_name = "TAG")]
    ignored: Vec<String>,

    /// Print attributes under each node in the tree view
    #[arg(long)]
    deep: bool,

    /// Dump the forest as JSON instead of the tree view
    #[arg(long)]
    json: bool,

    /// Print the text of the first node with this class in each tree
    #[arg(long, value_name = "VALUE")]
    find_class: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let markup = if args.source.starts_with("http://") || args.source.starts_with("https://") {
        sprig_common::net::fetch_text(&args.source)
            .with_context(|| format!("failed to fetch {}", args.source))?
    } else {
        fs::read_to_string(&args.source)
            .with_context(|| format!("failed to read {}", args.source))?
    };

    let start = match (args.below_tag, args.below_class) {
        (Some(tag), None) => StartCondition::TagName(tag),
        (None, Some(class)) => StartCondition::ClassValue(class),
        _ => StartCondition::FirstTag,
    };
    let ignored: Vec<&str> = args.ignored.iter().map(String::as_str).collect();

    let forest = build_forest(&markup, start, &ignored);
    eprintln!("{}", format!("{} tree(s) built", forest.len()).bold());

    if let Some(class) = args.find_class {
        for (index, tree) in forest.iter().enumerate() {
            match tree.find_class(&class).and_then(|node| node.text()) {
                Some(text) => println!("tree {index}: {}", text.trim()),
                None => println!("tree {index}: {}", "(no match)".dimmed()),
            }
        }
        return Ok(());
    }

    if args.json {
        let trees: Vec<Value> = forest
            .iter()
            .filter_map(|tree| tree.root_node().map(node_to_json))
            .collect();
        println!("{}", serde_json::to_string_pretty(&Value::Array(trees))?);
        return Ok(());
    }

    for (index, tree) in forest.iter().enumerate() {
        println!("{}", format!("=== Tree {index} ===").bold());
        print_tree(tree, args.deep);
    }

    Ok(())
}

fn node_to_json(node: NodeRef<'_>) -> Value {
    let mut object = serde_json::Map::new();
    let _ = object.insert("tag".to_string(), Value::String(node.tag_name().to_string()));

    let attributes: serde_json::Map<String, Value> = node
        .attributes()
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    let _ = object.insert("attributes".to_string(), Value::Object(attributes));

    let children: Vec<Value> = node.children().into_iter().map(node_to_json).collect();
    if !children.is_empty() {
        let _ = object.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(object)
}
