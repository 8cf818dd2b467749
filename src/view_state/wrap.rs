//! Greedy word wrapping of entry bodies.

use unicode_width::UnicodeWidthStr;

/// Wrap `text` to lines no wider than `width` display columns.
///
/// Existing newlines are kept as paragraph breaks (a blank source line
/// stays a blank output line). Words are packed greedily; a word wider
/// than `width` gets a line of its own and is never split. Empty input
/// yields no lines. A `width` of zero is treated as one.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
            } else {
                out.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            }
        }

        // Whitespace-only paragraphs still occupy a (blank) line.
        out.push(current);
    }

    out
}
