//! Placeholder snippet "rewriting" and the plain-text export of its output.
//!
//! No actual rewriting happens: each selected line is echoed inside a fixed
//! template.

/// Non-blank lines considered before selecting snippets.
const LINE_WINDOW: usize = 20;
/// Snippets returned per analysis.
pub const MAX_SNIPPETS: usize = 3;

/// Download filename for the exported snippets.
pub const EXPORT_FILENAME: &str = "rewritten_snippets.txt";

/// Wraps the first three non-blank (trimmed) lines of `candidate_text` in the
/// rewrite template.
pub fn rewrite_snippets(candidate_text: &str) -> Vec<String> {
    candidate_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(LINE_WINDOW)
        .take(MAX_SNIPPETS)
        .map(|line| format!("Improved: {line} -> {line} (tailored version)"))
        .collect()
}

/// Renders snippets as the downloadable text artifact, one per line.
pub fn render_snippets_export(snippets: &[String]) -> String {
    snippets.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_first_three_non_blank_lines() {
        let text = "\n  Jane Doe  \n\nSenior Engineer\n   \nBuilt things\nLed things\n";
        let snippets = rewrite_snippets(text);
        assert_eq!(
            snippets,
            vec![
                "Improved: Jane Doe -> Jane Doe (tailored version)",
                "Improved: Senior Engineer -> Senior Engineer (tailored version)",
                "Improved: Built things -> Built things (tailored version)",
            ]
        );
    }

    #[test]
    fn test_fewer_lines_than_limit() {
        assert_eq!(rewrite_snippets("only line").len(), 1);
        assert!(rewrite_snippets("").is_empty());
        assert!(rewrite_snippets("\n \n\t\n").is_empty());
    }

    #[test]
    fn test_handles_crlf_line_endings() {
        let snippets = rewrite_snippets("first\r\nsecond\r\n");
        assert_eq!(snippets[1], "Improved: second -> second (tailored version)");
    }

    #[test]
    fn test_export_joins_with_newlines() {
        let snippets = vec!["a".to_string(), "b".to_string()];
        assert_eq!(render_snippets_export(&snippets), "a\nb");
        assert_eq!(render_snippets_export(&[]), "");
    }
}
