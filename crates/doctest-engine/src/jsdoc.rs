// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Text of `/** ... */` comments, split into the body and its tags.

/// A piece of doc comment text anchored in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocText {
    pub text: String,
    /// 0-based file line holding the first line of `text`
    pub line: usize,
}

/// Strip the comment delimiters and `*` margins from `raw`, which starts on
/// file line `first_line`, and split it into the body followed by one text
/// per `@tag`, in written order. Empty pieces are dropped.
pub fn doc_texts(raw: &str, first_line: usize) -> Vec<DocText> {
    let inner = raw.strip_prefix("/**").unwrap_or(raw);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    let inner = inner.replace("\r\n", "\n").replace('\r', "\n");

    let mut sections: Vec<(usize, Vec<String>)> = vec![(first_line, Vec::new())];
    for (i, line) in inner.split('\n').enumerate() {
        let line = clean_line(line, i == 0);
        if let Some(rest) = tag_text(&line) {
            sections.push((first_line + i, vec![rest.to_string()]));
        } else if let Some((_, lines)) = sections.last_mut() {
            lines.push(line);
        }
    }

    sections
        .into_iter()
        .filter_map(|(line, lines)| trim_blank_lines(line, lines))
        .collect()
}

fn clean_line(line: &str, first: bool) -> String {
    let content = if first {
        line.strip_prefix(' ').unwrap_or(line)
    } else {
        let trimmed = line.trim_start();
        match trimmed.strip_prefix('*') {
            Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
            None => trimmed,
        }
    };
    let content = content.trim_end();
    // Fences would otherwise glue a code example to the prose around it
    if content.trim_start().starts_with("```") {
        String::new()
    } else {
        content.to_string()
    }
}

/// Tags whose first word names a parameter or property.
const NAMED_TAGS: [&str; 5] = ["param", "arg", "argument", "property", "prop"];

/// The comment text of a tag when `line` starts one.
///
/// For `@param {T} name text` and friends only `text` is kept.
fn tag_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('@')?;
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let text = rest[name_end..].trim_start();
    if !NAMED_TAGS.contains(&&rest[..name_end]) {
        return Some(text);
    }

    let text = match text.strip_prefix('{') {
        Some(_) => text[closing(text, '{', '}')..].trim_start(),
        None => text,
    };
    let name_end = match text.strip_prefix('[') {
        Some(_) => closing(text, '[', ']'),
        None => text.find(char::is_whitespace).unwrap_or(text.len()),
    };
    Some(text[name_end..].trim_start())
}

/// Byte offset just past the bracket closing the one `text` starts with,
/// or the end of `text` when it never closes.
fn closing(text: &str, open: char, close: char) -> usize {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return i + c.len_utf8();
            }
        }
    }
    text.len()
}

fn trim_blank_lines(mut line: usize, lines: Vec<String>) -> Option<DocText> {
    let first = lines.iter().position(|l| !l.is_empty())?;
    let last = lines.iter().rposition(|l| !l.is_empty())?;
    line += first;
    Some(DocText { text: lines[first..=last].join("\n"), line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DanglingMarkers;
    use crate::script::{extract_script, Operation};

    fn texts(raw: &str) -> Vec<(String, usize)> {
        doc_texts(raw, 10).into_iter().map(|d| (d.text, d.line)).collect()
    }

    #[test]
    fn single_line_comment() {
        assert_eq!(texts("/** f() // => 1 */"), vec![("f() // => 1".to_string(), 10)]);
    }

    #[test]
    fn margins_are_stripped_and_anchor_follows_first_text_line() {
        let raw = "/**\n     * Adds.\n     *\n     *   add(1, 2) // => 3\n     */";
        assert_eq!(texts(raw), vec![("Adds.\n\n  add(1, 2) // => 3".to_string(), 11)]);
    }

    #[test]
    fn tags_become_separate_texts() {
        let raw = "/**\n * Body.\n * @param x the input\n * @example\n * f(1) // => 2\n * @returns\n */";
        assert_eq!(
            texts(raw),
            vec![
                ("Body.".to_string(), 11),
                ("the input".to_string(), 12),
                ("f(1) // => 2".to_string(), 14),
            ]
        );
    }

    #[test]
    fn parameter_names_are_not_tag_text() {
        let raw = "/**\n * @param {Array<{a: number}>} [xs=[]] the list\n * @arg y\n * @property z used as\n *   z.size // => 0\n * @see other docs\n */";
        assert_eq!(
            texts(raw),
            vec![
                ("the list".to_string(), 11),
                ("used as\n  z.size // => 0".to_string(), 13),
                ("other docs".to_string(), 15),
            ]
        );
    }

    #[test]
    fn lone_carriage_returns_break_lines() {
        let found = texts("/** a\r// => 1 */");
        assert_eq!(found, vec![("a\n// => 1".to_string(), 10)]);

        let script = extract_script(&found[0].0, 0, DanglingMarkers::Ignore, &mut Vec::new()).expect("script");
        assert_eq!(script, vec![Operation::Assertion { lhs: "a".into(), rhs: "1".into(), line: 1 }]);
    }

    #[test]
    fn fences_and_carriage_returns_are_removed() {
        let raw = "/**\r\n * ```ts\r\n * f() // => 1\r\n * ```\r\n */";
        assert_eq!(texts(raw), vec![("f() // => 1".to_string(), 12)]);
    }

    #[test]
    fn empty_comment_has_no_text() {
        assert!(texts("/** */").is_empty());
        assert!(texts("/**\n *\n */").is_empty());
    }
}
