//! Shared fixtures: documents annotated the way an external tokenizer would,
//! by matching text and carving the matched ranges out of the root.

use regex::Regex;
use textscope_engine::{Document, NodeId, ScopeTree, Span};

/// "one fish-0 two fish-1 red fish-2 blue fish-3" with every numbered phrase
/// branched and its adjective/noun tagged inside.
pub fn fish_document() -> Document {
    let mut doc = Document::new("one fish-0 two fish-1 red fish-2 blue fish-3", "test");
    tag_phrases(&mut doc, r"(\S+)\s*(fish-\d)");
    doc
}

/// Tags every `<adjective> <noun>` match of `pattern` (two capture groups)
/// as a branched `phrase` with `adjective` and `noun` children.
pub fn tag_phrases(doc: &mut Document, pattern: &str) {
    let regex = Regex::new(pattern).unwrap();
    let matches: Vec<(Span, Span, Span)> = regex
        .captures_iter(doc.source())
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            let adjective = caps.get(1).unwrap();
            let noun = caps.get(2).unwrap();
            (
                Span::new(whole.start(), whole.end()),
                Span::new(adjective.start(), adjective.end()),
                Span::new(noun.start(), noun.end()),
            )
        })
        .collect();
    for (whole, adjective, noun) in matches {
        let root = doc.root();
        let phrase = doc.slice_and_branch(root, whole).unwrap();
        doc.set_kind(phrase, "phrase");
        let word = doc.slice(root, adjective).unwrap();
        doc.set_kind(word, "adjective");
        let word = doc.slice(root, noun).unwrap();
        doc.set_kind(word, "noun");
    }
}

/// Annotates every `<name>...</name>` element in `[start, end)` of the
/// document, recursively: the element is branched as `element.<name>`, its
/// delimiters tagged `tag.<name>.open`/`.close`, and its content branched as
/// `element.<name>.body`. The first closing delimiter after an opening one
/// wins, matching a non-greedy scan.
pub fn mark_tags(doc: &mut Document, start: usize, end: usize) {
    let open_regex = Regex::new(r"<([a-z]+)>").unwrap();
    let mut cursor = start;
    loop {
        let window = doc.source()[cursor..end].to_string();
        let Some(caps) = open_regex.captures(&window) else {
            break;
        };
        let name = caps.get(1).unwrap().as_str().to_string();
        let open = caps.get(0).unwrap();
        let open_start = cursor + open.start();
        let open_end = cursor + open.end();
        let close_delimiter = format!("</{name}>");
        let Some(found) = window[open.end()..].find(&close_delimiter) else {
            break;
        };
        let close_start = open_end + found;
        let close_end = close_start + close_delimiter.len();

        let root = doc.root();
        let element = doc
            .slice_and_branch(root, Span::new(open_start, close_end))
            .unwrap();
        doc.set_kind(element, format!("element.{name}"));
        let tag = doc.slice(root, Span::new(open_start, open_end)).unwrap();
        doc.set_kind(tag, format!("tag.{name}.open"));
        let body = doc
            .slice_and_branch(root, Span::new(open_end, close_start))
            .unwrap();
        doc.set_kind(body, format!("element.{name}.body"));
        let tag = doc.slice(root, Span::new(close_start, close_end)).unwrap();
        doc.set_kind(tag, format!("tag.{name}.close"));

        mark_tags(doc, open_end, close_start);
        cursor = close_end;
    }
}

pub fn texts(tree: &ScopeTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| tree.text(id).to_string()).collect()
}
