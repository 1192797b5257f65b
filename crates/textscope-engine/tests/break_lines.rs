mod common;

use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::{json, Value};
use textscope_engine::{Document, Flow, Span, WalkOptions};

use common::mark_tags;

fn serialized_lines(doc: &Document, lines: &[Vec<textscope_engine::NodeId>]) -> Vec<Vec<Value>> {
    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|&id| serde_json::to_value(doc.serialize(id)).unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn lines_group_nodes_and_omit_terminators() {
    let mut doc = Document::new("one two\nthree\nfour five six", "test");

    let word_regex = Regex::new(r"\w+").unwrap();
    let words: Vec<Span> = word_regex
        .find_iter(doc.source())
        .map(|found| Span::new(found.start(), found.end()))
        .collect();
    for span in words {
        let root = doc.root();
        let word = doc.slice(root, span).unwrap();
        doc.set_kind(word, "word");
    }

    let blank = Regex::new(r"^\s+$").unwrap();
    let whitespace = doc.walk(doc.root(), WalkOptions::default(), |tree, id, walker| {
        if blank.is_match(tree.text(id)) {
            walker.collect(id);
        }
        Flow::Continue
    });
    for id in whitespace {
        doc.set_kind(id, "whitespace");
    }

    let lines = doc.break_lines().unwrap();
    assert_eq!(
        serialized_lines(&doc, &lines),
        vec![
            vec![
                json!(["word", "one"]),
                json!(["whitespace", " "]),
                json!(["word", "two"])
            ],
            vec![json!(["word", "three"])],
            vec![
                json!(["word", "four"]),
                json!(["whitespace", " "]),
                json!(["word", "five"]),
                json!(["whitespace", " "]),
                json!(["word", "six"])
            ]
        ]
    );
}

#[test]
fn breaking_an_unannotated_document_into_lines() {
    let mut doc = Document::new("One line.\nTwo line.\nThree line.\nFour.", "test");
    doc.break_lines().unwrap();
    assert_eq!(
        serde_json::to_value(doc.serialize(doc.root())).unwrap(),
        json!([
            "source.test",
            [
                ["", "One line."],
                ["newline", "\n"],
                ["", "Two line."],
                ["newline", "\n"],
                ["", "Three line."],
                ["newline", "\n"],
                ["", "Four."]
            ]
        ])
    );
}

#[test]
fn breaking_a_nested_tree_produces_cross_sections() {
    let mut doc = Document::new(
        "<foo><bar>double nested</bar></foo>\n<foo>\n    multi\n    line!\n</foo>",
        "test",
    );
    let end = doc.source().len();
    mark_tags(&mut doc, 0, end);
    doc.break_lines().unwrap();

    // Every line terminator cuts straight through the element that spans it;
    // each side keeps a same-kind wrapper chain down to the cut.
    assert_eq!(
        serde_json::to_value(doc.serialize(doc.root())).unwrap(),
        json!([
            "source.test",
            [
                [
                    "element.foo",
                    [
                        ["tag.foo.open", "<foo>"],
                        [
                            "element.foo.body",
                            [[
                                "element.bar",
                                [
                                    ["tag.bar.open", "<bar>"],
                                    ["element.bar.body", [["", "double nested"]]],
                                    ["tag.bar.close", "</bar>"]
                                ]
                            ]]
                        ],
                        ["tag.foo.close", "</foo>"]
                    ]
                ],
                ["newline", "\n"],
                ["element.foo", [["tag.foo.open", "<foo>"]]],
                ["newline", "\n"],
                ["element.foo", [["element.foo.body", [["", "    multi"]]]]],
                ["newline", "\n"],
                ["element.foo", [["element.foo.body", [["", "    line!"]]]]],
                ["newline", "\n"],
                ["element.foo", [["tag.foo.close", "</foo>"]]]
            ]
        ])
    );
}

#[test]
fn carriage_return_line_feeds_are_single_terminators() {
    let mut doc = Document::new("one\r\ntwo", "test");
    doc.break_lines().unwrap();
    assert_eq!(
        serde_json::to_value(doc.serialize(doc.root())).unwrap(),
        json!([
            "source.test",
            [["", "one"], ["newline", "\r\n"], ["", "two"]]
        ])
    );
}
