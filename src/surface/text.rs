//! Display-width text helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display columns of `text`.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Display columns of `ch` (zero-width and control characters count as 0).
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Word-wrap `text` to lines of at most `max_width` columns.
///
/// Breaks at spaces when one fits, otherwise mid-word. Explicit `\n` starts a
/// new line. Returns no lines for a zero width.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, max_width, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_width: usize, out: &mut Vec<String>) {
    let mut remaining = paragraph;
    loop {
        if display_width(remaining) <= max_width {
            out.push(remaining.to_owned());
            return;
        }

        let mut width = 0;
        let mut break_at = 0;
        let mut last_space = None;
        for (idx, ch) in remaining.char_indices() {
            let w = char_width(ch);
            if width + w > max_width {
                break;
            }
            width += w;
            break_at = idx + ch.len_utf8();
            if ch == ' ' {
                last_space = Some(idx);
            }
        }

        let split = match last_space {
            Some(space) if space > 0 => space,
            _ if break_at > 0 => break_at,
            // A single character wider than the line; take it anyway.
            _ => remaining
                .char_indices()
                .nth(1)
                .map_or(remaining.len(), |(idx, _)| idx),
        };
        out.push(remaining[..split].trim_end().to_owned());
        remaining = remaining[split..].trim_start_matches(' ');
        if remaining.is_empty() {
            return;
        }
    }
}

/// Pad `text` on both sides to center it in `width` columns.
pub fn center(text: &str, width: usize) -> String {
    let w = display_width(text);
    if w >= width {
        return text.to_owned();
    }
    let left = (width - w) / 2;
    format!("{}{}", " ".repeat(left), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap("Rest", 10), vec!["Rest"]);
    }

    #[test]
    fn wraps_at_spaces() {
        assert_eq!(
            wrap("Stay hydrated and rest", 10),
            vec!["Stay", "hydrated", "and rest"]
        );
    }

    #[test]
    fn breaks_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        assert_eq!(wrap("a\n\nb", 5), vec!["a", "", "b"]);
    }

    #[test]
    fn zero_width_yields_nothing() {
        assert!(wrap("anything", 0).is_empty());
    }

    #[test]
    fn centers_text() {
        assert_eq!(center("ab", 6), "  ab");
        assert_eq!(center("toolong", 3), "toolong");
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(display_width("頭痛"), 4);
        assert_eq!(wrap("頭痛頭", 4), vec!["頭痛", "頭"]);
    }
}
