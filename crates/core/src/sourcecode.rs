//! Source-code cleanup helpers for fetched student files.
//!
//! Comment stripping is extension-driven: Python files get line-based `#`
//! removal, C-family files get `//` and `/* */` removal, HTML gets
//! `<!-- -->` removal. Unknown extensions pass through unchanged.

use std::sync::OnceLock;

use regex::Regex;

/// Strip comments from `source`, choosing the removal strategy from the
/// file extension of `filename` (case-insensitive).
pub fn strip_comments(source: &str, filename: &str) -> String {
    match extension(filename).as_deref() {
        Some("py") => strip_hash_comments(source),
        Some("js" | "css" | "java" | "c" | "cpp") => strip_c_style_comments(source),
        Some("html") => strip_html_comments(source),
        _ => source.to_string(),
    }
}

/// Lowercased extension of `filename`, without the leading dot.
fn extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Remove full-line and inline `#` comments, line by line.
fn strip_hash_comments(source: &str) -> String {
    let mut lines = Vec::new();
    for line in source.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        match line.split_once('#') {
            Some((code, _)) => lines.push(code.trim_end()),
            None => lines.push(line),
        }
    }
    lines.join("\n")
}

/// Remove `//` line comments and `/* */` block comments.
fn strip_c_style_comments(source: &str) -> String {
    static LINE: OnceLock<Regex> = OnceLock::new();
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    let line = LINE.get_or_init(|| Regex::new(r"//.*").expect("valid regex"));
    let block = BLOCK.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

    let without_lines = line.replace_all(source, "");
    block.replace_all(&without_lines, "").into_owned()
}

/// Remove `<!-- -->` comments, including multi-line ones.
fn strip_html_comments(source: &str) -> String {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    let comment = COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
    comment.replace_all(source, "").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Python --

    #[test]
    fn python_full_line_comments_removed() {
        let source = "# header\nx = 1\n# trailing";
        assert_eq!(strip_comments(source, "a.py"), "x = 1");
    }

    #[test]
    fn python_inline_comments_removed() {
        let source = "x = 1  # set x";
        assert_eq!(strip_comments(source, "a.py"), "x = 1");
    }

    // -- C-family --

    #[test]
    fn js_line_comments_removed() {
        let source = "let x = 1; // counter\nlet y = 2;";
        assert_eq!(strip_comments(source, "app.js"), "let x = 1; \nlet y = 2;");
    }

    #[test]
    fn c_block_comments_removed_across_lines() {
        let source = "int x;\n/* multi\nline */\nint y;";
        assert_eq!(strip_comments(source, "main.c"), "int x;\n\nint y;");
    }

    // -- HTML --

    #[test]
    fn html_comments_removed() {
        let source = "<div><!-- note\nspanning --></div>";
        assert_eq!(strip_comments(source, "index.html"), "<div></div>");
    }

    // -- passthrough --

    #[test]
    fn unknown_extension_is_unchanged() {
        let source = "# not python\n// not js";
        assert_eq!(strip_comments(source, "data.txt"), source);
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(strip_comments("x = 1 # c", "A.PY"), "x = 1");
    }
}
