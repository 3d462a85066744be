//! DocBook XML text → tree parsing.
//!
//! Built on the quick-xml event reader. Parsing is deliberately lenient:
//! mismatched end tags are tolerated and a malformed tail stops token
//! consumption instead of failing the document, since legacy DocBook sources
//! are rarely pristine. Entity references that are not predefined XML
//! entities pass through as literal `&name;` text so the translation phase
//! can resolve them against collected entity definitions.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::tree::{Kind, NodeId, Tree};

/// Parse a whole document into a fresh tree.
pub fn parse(text: &str) -> Tree {
    let mut tree = Tree::new();
    let roots = parse_fragment(&mut tree, text);
    for id in roots {
        tree.add_root(id);
    }
    tree
}

/// Parse markup into detached nodes allocated in `tree`, returning the
/// top-level sequence. Used both for whole documents and for entity
/// replacement values.
pub fn parse_fragment(tree: &mut Tree, text: &str) -> Vec<NodeId> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut roots: Vec<NodeId> = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();

    macro_rules! place {
        ($id:expr) => {
            match stack.last() {
                Some(&parent) => tree.add_child(parent, $id),
                None => roots.push($id),
            }
        };
    }

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(local_name(e.name().as_ref())).into_owned();
                let id = tree.new_node(Kind::parse(&name));
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(local_name(attr.key.as_ref())).into_owned();
                    let value = unescape_lenient(&String::from_utf8_lossy(&attr.value));
                    tree.set_attr(id, &key, &value);
                }
                place!(id);
                stack.push(id);
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(local_name(e.name().as_ref())).into_owned();
                let id = tree.new_node(Kind::parse(&name));
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(local_name(attr.key.as_ref())).into_owned();
                    let value = unescape_lenient(&String::from_utf8_lossy(&attr.value));
                    tree.set_attr(id, &key, &value);
                }
                place!(id);
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                let text = unescape_lenient(&String::from_utf8_lossy(&e));
                let id = tree.new_text(&text);
                place!(id);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                let id = tree.new_text(&text);
                place!(id);
            }
            Ok(Event::GeneralRef(e)) => {
                let name = String::from_utf8_lossy(&e).into_owned();
                let id = tree.new_text(&resolve_reference(&name));
                place!(id);
            }
            Ok(Event::DocType(e)) => {
                // Kept raw: declaration values must stay escaped until their
                // fragments are parsed.
                let content = String::from_utf8_lossy(&e).into_owned();
                let id = tree.new_node(Kind::Directive);
                tree.set_attr(id, "DIRECTIVE", &format!("DOCTYPE {}", content.trim_start()));
                place!(id);
            }
            Ok(Event::PI(e)) => {
                let content = String::from_utf8_lossy(&e).into_owned();
                let (target, instruction) = match content.split_once(char::is_whitespace) {
                    Some((t, i)) => (t.to_string(), i.to_string()),
                    None => (content, String::new()),
                };
                let id = tree.new_node(Kind::ProcessingInstruction);
                tree.set_attr(id, "TARGET", &target);
                tree.set_attr(id, "INSTRUCTION", &instruction);
                place!(id);
            }
            Ok(Event::Decl(_)) | Ok(Event::Comment(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => {
                // Keep whatever parsed so far; legacy sources are often lax.
                tracing::debug!("stopping parse on malformed markup: {e}");
                break;
            }
        }
    }

    roots
}

/// Strip a namespace prefix: `xi:include` -> `include`.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Resolve a general entity reference name to replacement text. Predefined
/// XML entities and character references decode; anything else stays a
/// literal `&name;` token.
fn resolve_reference(name: &str) -> String {
    match name {
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "amp" => "&".to_string(),
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        _ => match char_reference(name) {
            Some(c) => c.to_string(),
            None => format!("&{name};"),
        },
    }
}

fn char_reference(name: &str) -> Option<char> {
    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code)
}

/// Decode predefined entities and character references in raw text, leaving
/// unknown `&name;` references untouched.
fn unescape_lenient(raw: &str) -> String {
    let Some(first) = raw.find('&') else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut rest = &raw[first..];
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        match rest[1..].find(';') {
            // A plausible reference name: no whitespace, reasonably short
            Some(end) if end > 0 && end <= 64 && !rest[1..1 + end].contains(char::is_whitespace) => {
                out.push_str(&resolve_reference(&rest[1..1 + end]));
                rest = &rest[end + 2..];
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
