//! List-item block formatting.
//!
//! A list item's translated content gets a `+` continuation marker at every
//! blank line so the target renderer keeps subsequent blocks attached to the
//! item — except inside fenced sub-blocks, where a blank line is literal
//! content and a marker would break the fence.

/// Symbols whose runs of length ≥ 4 open a delimited block.
const DELIMITERS: [u8; 8] = [b'-', b'=', b'/', b'.', b'+', b'_', b'*', b'|'];

/// Insert list-continuation markers at blank lines outside fenced blocks and
/// collapse doubled markers.
pub fn continuation_scan(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 16);
    let mut fence_len = 0usize;
    let mut fence_char = 0u8;

    for line in content.split('\n') {
        if line.is_empty() {
            if fence_len == 0 {
                out.push('+');
            }
            out.push('\n');
            continue;
        }
        out.push_str(line);
        out.push('\n');

        let bytes = line.as_bytes();
        if fence_len == 0 {
            if bytes.len() >= 4 && DELIMITERS.contains(&bytes[0]) {
                // A | fence closes on its = delimiter line
                let delim = if bytes[0] == b'|' { b'=' } else { bytes[0] };
                if bytes.iter().all(|&b| b == delim) {
                    fence_len = bytes.len();
                    fence_char = bytes[0];
                }
            }
        } else if bytes.len() == fence_len && bytes[0] == fence_char {
            fence_len = 0;
        }
    }

    while out.contains("\n+\n+\n") {
        out = out.replace("\n+\n+\n", "\n+\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_get_continuation_markers() {
        assert_eq!(continuation_scan("a\n\nb"), "a\n+\nb\n");
    }

    #[test]
    fn blank_lines_inside_fences_are_untouched() {
        let content = "intro\n\n----\ncode\n\nmore code\n----\nafter\n\nend";
        let scanned = continuation_scan(content);
        assert_eq!(
            scanned,
            "intro\n+\n----\ncode\n\nmore code\n----\nafter\n+\nend\n"
        );
    }

    #[test]
    fn short_runs_do_not_open_fences() {
        assert_eq!(continuation_scan("---\n\nx"), "---\n+\nx\n");
    }

    #[test]
    fn fence_close_requires_matching_length() {
        let scanned = continuation_scan("-----\n\n----\n\n-----\nx");
        // The four-dash line does not close the five-dash fence.
        assert_eq!(scanned, "-----\n\n----\n\n-----\nx\n");
    }

    #[test]
    fn doubled_markers_collapse() {
        assert_eq!(continuation_scan("a\n\n\nb"), "a\n+\nb\n");
    }
}
