//! Small shared helpers: text decoding and path/string utilities.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// Tries UTF-8 first (BOM handled automatically via encoding_rs), then falls
/// back to Windows-1252, which is a superset of ISO-8859-1 and common in
/// legacy DocBook sources.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Remove the final extension from a file name: `Chapter.xml` -> `Chapter`.
pub fn strip_ext(filename: &str) -> &str {
    match filename.rfind('.') {
        // A dot inside the last path component only
        Some(idx) if !filename[idx..].contains('/') => &filename[..idx],
        _ => filename,
    }
}

/// Return the text between the first occurrence of `a` and the next
/// occurrence of `b` after it, or `""` if either delimiter is missing.
pub fn find_between<'a>(s: &'a str, a: &str, b: &str) -> &'a str {
    if let Some(start) = s.find(a) {
        let rest = &s[start + a.len()..];
        if let Some(end) = rest.find(b) {
            return &rest[..end];
        }
    }
    ""
}

/// Lexically normalize a relative path: collapses `.` segments, duplicate
/// separators, and `..` where a parent component is available. Used to build
/// stable resource-map keys.
pub fn clean_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(&p) if p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            _ => parts.push(seg),
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        let mut out = String::new();
        if path.starts_with('/') {
            out.push('/');
        }
        out.push_str(&parts.join("/"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ext_basics() {
        assert_eq!(strip_ext("Chapter.xml"), "Chapter");
        assert_eq!(strip_ext("dir.d/Chapter"), "dir.d/Chapter");
        assert_eq!(strip_ext("noext"), "noext");
    }

    #[test]
    fn find_between_basics() {
        assert_eq!(find_between("ENTITY KEY \"VALUE\"", "ENTITY ", " \""), "KEY");
        assert_eq!(find_between("no delims here", "<", ">"), "");
    }

    #[test]
    fn clean_path_basics() {
        assert_eq!(clean_path("./images/icon.png"), "images/icon.png");
        assert_eq!(clean_path("a/./b//c"), "a/b/c");
        assert_eq!(clean_path("a/../b"), "b");
        assert_eq!(clean_path("."), ".");
    }

    #[test]
    fn decode_utf8_and_fallback() {
        assert_eq!(decode_text("héllo".as_bytes()), "héllo");
        // 0xE9 is 'é' in Windows-1252 but malformed UTF-8
        assert_eq!(decode_text(&[b'h', 0xE9]), "hé");
    }
}
