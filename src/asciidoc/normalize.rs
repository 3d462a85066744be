//! Post-processing passes applied to each emitted text unit.
//!
//! The translation pass leaves `pass:attributes[{blank}]` boundary markers
//! around inline quotes and literal `&name;` entity tokens in the text; this
//! module strips the markers where punctuation or whitespace already
//! separates the quote, rewrites entity tokens to attribute references, and
//! collapses the whitespace noise of tree-shaped emission. Every pass runs to
//! a fixed point, so normalizing twice equals normalizing once.

use std::collections::HashMap;

use memchr::memmem;

/// The zero-width boundary marker emitted around inline quotes.
pub const BLANK_MARKER: &str = "pass:attributes[{blank}]";

/// Punctuation/whitespace that already separates a quote from its
/// surroundings, making the boundary marker redundant.
const SEPARATORS: [char; 10] = [' ', ',', '.', '!', '?', '-', '\n', '(', ')', '|'];

fn replace_until_stable(mut text: String, from: &str, to: &str) -> String {
    while memmem::find(text.as_bytes(), from.as_bytes()).is_some() {
        text = text.replace(from, to);
    }
    text
}

/// Normalize one output text unit.
pub fn normalize(text: &str, entities: &HashMap<String, String>) -> String {
    // Doubled inline-quote markers would visually merge.
    let mut text = replace_until_stable(text.to_string(), "``", "` `");

    // Strip boundary markers adjacent to separators (and before a
    // line-attribute colon).
    loop {
        let before = text.len();
        for sep in SEPARATORS {
            text = text.replace(&format!("{BLANK_MARKER}{sep}"), &sep.to_string());
            text = text.replace(&format!("{sep}{BLANK_MARKER}"), &sep.to_string());
        }
        text = text.replace(&format!("{BLANK_MARKER}:"), ":");
        if text.len() == before {
            break;
        }
    }

    // Entity reference tokens become attribute references.
    for name in entities.keys() {
        text = text.replace(&format!("&{name};"), &format!("{{{name}}}"));
    }

    // At most one blank line anywhere.
    text = replace_until_stable(text, "\n\n\n", "\n\n");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("nbsp".to_string(), String::new());
        map.insert("PRODUCT".to_string(), "Widget".to_string());
        map
    }

    #[test]
    fn strips_markers_next_to_separators() {
        let text = format!("Hello {BLANK_MARKER}*world*{BLANK_MARKER}.");
        assert_eq!(normalize(&text, &entities()), "Hello *world*.");
    }

    #[test]
    fn keeps_markers_inside_words() {
        let text = format!("mid{BLANK_MARKER}`word`");
        assert_eq!(normalize(&text, &entities()), format!("mid{BLANK_MARKER}`word`"));
    }

    #[test]
    fn splits_doubled_backticks() {
        assert_eq!(normalize("a``b", &entities()), "a` `b");
        assert!(!normalize("```", &entities()).contains("``"));
    }

    #[test]
    fn rewrites_entity_tokens() {
        assert_eq!(normalize("&PRODUCT; v2", &entities()), "{PRODUCT} v2");
        assert_eq!(normalize("a&nbsp;b", &entities()), "a{nbsp}b");
    }

    #[test]
    fn collapses_blank_lines_and_trims() {
        assert_eq!(normalize("\n\na\n\n\n\nb\n\n", &entities()), "a\n\nb");
    }

    #[test]
    fn marker_before_colon_is_stripped() {
        let text = format!("{BLANK_MARKER}: value");
        assert_eq!(normalize(&text, &entities()), ": value");
    }

    proptest::proptest! {
        #[test]
        fn idempotent(pieces in proptest::collection::vec(
            proptest::sample::select(vec![
                "`", "``", BLANK_MARKER, "&nbsp;", "&PRODUCT;", " ", "\n", "\n\n",
                "a", "b", "]", ":", ",", ".", "(", "|", "word",
            ]),
            0..24,
        )) {
            let input: String = pieces.concat();
            let once = normalize(&input, &entities());
            let twice = normalize(&once, &entities());
            proptest::prop_assert_eq!(once, twice);
        }
    }
}
