//! Whitespace cleanup for raw OCR lines.

use super::patterns::WHITESPACE_RUN;

/// Trim a raw OCR line and collapse every whitespace run to one space.
pub fn normalize_line(line: &str) -> String {
    WHITESPACE_RUN.replace_all(line.trim(), " ").into_owned()
}

/// Whether `c` ends a line. Covers the Unicode line boundaries OCR engines
/// emit, not just `\n`.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines on every line boundary. `\r\n` is one break and a
/// trailing break does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Count ASCII digits in a line.
pub fn digit_count(line: &str) -> usize {
    line.chars().filter(|c| c.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("  ARROZ   TIO\tJOAO  5KG "), "ARROZ TIO JOAO 5KG");
        assert_eq!(normalize_line("\u{00a0}LEITE\u{00a0}\u{00a0}1L"), "LEITE 1L");
        assert_eq!(normalize_line("   "), "");
        assert_eq!(normalize_line(""), "");
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("A\nB"), vec!["A", "B"]);
        assert_eq!(split_lines("A\r\nB\r\n"), vec!["A", "B"]);
        assert_eq!(split_lines("A\rB"), vec!["A", "B"]);
        assert_eq!(split_lines("A\u{2028}B\u{2029}C\u{85}D"), vec!["A", "B", "C", "D"]);
        assert_eq!(split_lines("A\x0bB\x0cC\x1cD\x1dE\x1eF"), vec!["A", "B", "C", "D", "E", "F"]);
        assert_eq!(split_lines("A\n\nB"), vec!["A", "", "B"]);
        assert_eq!(split_lines("A\r\rB"), vec!["A", "", "B"]);
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("\n"), vec![""]);
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count("PAO 2 x 0,50"), 4);
        assert_eq!(digit_count("OBRIGADO"), 0);
    }
}
