// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Script parser: turns comment text into test case candidates.
//!
//! A comment is split into blank-line separated paragraphs. Paragraphs
//! holding an assertion marker (`// => expected`) are doctests; each one is
//! split into statements, and an expression statement directly followed by a
//! marker becomes an assertion. All lines here are relative to the comment.

use std::sync::LazyLock;

use doctest_ast::line_offset;
use doctest_ast::Span;
use doctest_lexer::{LexError, Lexer};
use doctest_parser::{split_fragments, FragmentKind, ParseError};
use regex::Regex;
use serde::Serialize;

use crate::config::DanglingMarkers;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?://|/\*)[ \t]*=>").expect("marker pattern is valid"));

static LINE_RHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*//[ \t]*=>([^\n]*)").expect("rhs pattern is valid"));

static BLOCK_RHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*/\*[ \t]*=>(.*?)\*/").expect("block rhs pattern is valid"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("paragraph pattern is valid"));

static LEADING_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*//([^\n]*)").expect("name pattern is valid"));

/// One step of a doctest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operation {
    /// Code run for its effect
    Statement { code: String },
    /// `lhs` must deep-equal `rhs`; `line` is where the marker sits
    Assertion { lhs: String, rhs: String, line: usize },
}

impl Operation {
    fn shifted(self, by: usize) -> Self {
        match self {
            Operation::Assertion { lhs, rhs, line } => Operation::Assertion { lhs, rhs, line: line + by },
            statement => statement,
        }
    }
}

/// Operations of one doctest, in written order.
pub type ScriptBlock = Vec<Operation>;

/// A doctest paragraph before it is placed in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub script: ScriptBlock,
    pub name: Option<String>,
    /// Line of the paragraph's first line
    pub line: usize,
}

impl Candidate {
    /// Move every line by `by`, turning comment lines into file lines.
    pub fn shifted(self, by: usize) -> Self {
        Candidate {
            script: self.script.into_iter().map(|op| op.shifted(by)).collect(),
            name: self.name,
            line: self.line + by,
        }
    }
}

/// Something odd that did not stop generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub line: usize,
    pub message: String,
}

/// Why a paragraph could not be turned into a script.
#[derive(Debug, Clone)]
pub enum ScriptError {
    Lex(LexError),
    Parse(ParseError),
    DanglingMarker { line: usize },
}

/// A marker found in the text after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker<'a> {
    /// Byte offset of `//` or `/*`
    offset: usize,
    rhs: &'a str,
}

/// True when `s` contains an assertion marker.
pub fn is_doctest(s: &str) -> bool {
    MARKER.is_match(s)
}

/// The expected-value text of the first marker line in `s`, untrimmed.
pub fn doctest_rhs(s: &str) -> Option<&str> {
    first_marker(s).map(|m| m.rhs)
}

/// Lines of `text` that are import declarations, in order.
pub fn extract_imports(text: &str) -> Vec<String> {
    text.lines().filter(|line| is_import_line(line)).map(str::to_string).collect()
}

fn is_import_line(line: &str) -> bool {
    line.strip_prefix("import")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace() || matches!(c, '{' | '*' | '"' | '\'')))
}

/// All doctest candidates of one comment.
///
/// Paragraphs that can't be tokenized are skipped with a warning; a dangling
/// marker fails the whole comment only under [`DanglingMarkers::Error`].
pub fn extract_scripts(
    text: &str,
    policy: DanglingMarkers,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Candidate>, ScriptError> {
    let mut candidates = Vec::new();
    for (offset, paragraph) in paragraphs(text) {
        if !is_doctest(paragraph) {
            continue;
        }
        let line = line_offset(text, offset);
        let script = match extract_script(paragraph, line, policy, warnings) {
            Ok(script) => script,
            Err(ScriptError::Lex(error)) => {
                warnings.push(skipped(paragraph, line, &error.span, &error.message));
                continue;
            }
            Err(ScriptError::Parse(error)) => {
                warnings.push(skipped(paragraph, line, &error.span, &error.message));
                continue;
            }
            Err(dangling) => return Err(dangling),
        };
        if script.is_empty() {
            continue;
        }
        candidates.push(Candidate { script, name: paragraph_name(paragraph), line });
    }
    Ok(candidates)
}

fn skipped(paragraph: &str, line: usize, span: &Span, message: &str) -> Warning {
    Warning {
        line: line + line_offset(paragraph, span.start),
        message: format!("skipped doctest: {}", message.to_lowercase()),
    }
}

/// Blank-line separated paragraphs with their byte offsets.
fn paragraphs(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for gap in PARAGRAPH_BREAK.find_iter(text) {
        out.push((start, &text[start..gap.start()]));
        start = gap.end();
    }
    out.push((start, &text[start..]));
    out
}

/// A leading `//` line that isn't itself a marker names the test.
fn paragraph_name(paragraph: &str) -> Option<String> {
    let caps = LEADING_NAME.captures(paragraph)?;
    let whole = caps.get(0)?.as_str();
    if is_doctest(whole) {
        return None;
    }
    Some(caps.get(1)?.as_str().trim().to_string())
}

/// The earliest line or block marker in `s`.
fn first_marker(s: &str) -> Option<Marker<'_>> {
    let line = LINE_RHS.captures(s).and_then(|c| marker_from(&c));
    let block = BLOCK_RHS.captures(s).and_then(|c| marker_from(&c));
    match (line, block) {
        (Some(l), Some(b)) => Some(if b.offset < l.offset { b } else { l }),
        (l, b) => l.or(b),
    }
}

fn marker_from<'a>(caps: &regex::Captures<'a>) -> Option<Marker<'a>> {
    let whole = caps.get(0)?;
    let leading = whole.as_str().len() - whole.as_str().trim_start().len();
    Some(Marker { offset: whole.start() + leading, rhs: caps.get(1)?.as_str() })
}

/// Offsets of every marker in `s`, line or block form.
fn all_markers(s: &str) -> Vec<usize> {
    let mut offsets: Vec<usize> = LINE_RHS
        .captures_iter(s)
        .chain(BLOCK_RHS.captures_iter(s))
        .filter_map(|c| marker_from(&c).map(|m| m.offset))
        .collect();
    offsets.sort_unstable();
    offsets
}

/// Parse one paragraph whose first line is comment line `line_start`.
pub fn extract_script(
    paragraph: &str,
    line_start: usize,
    policy: DanglingMarkers,
    warnings: &mut Vec<Warning>,
) -> Result<ScriptBlock, ScriptError> {
    let lexed = Lexer::new(paragraph).tokenize();
    if let Some(error) = lexed.errors.into_iter().next() {
        return Err(ScriptError::Lex(error));
    }
    let comments: Vec<Span> = lexed
        .tokens
        .iter()
        .filter(|t| t.kind.is_comment())
        .map(|t| t.span)
        .collect();
    let fragments = split_fragments(lexed.tokens).map_err(ScriptError::Parse)?;

    let line_at = |offset: usize| line_start + line_offset(paragraph, offset);
    let mut dangling = Vec::new();

    let lead_end = fragments.first().map_or(paragraph.len(), |first| first.span.start);
    dangling.extend(all_markers(&paragraph[..lead_end]));

    let mut script = Vec::new();
    for (i, fragment) in fragments.iter().enumerate() {
        let gap_end = fragments.get(i + 1).map_or(paragraph.len(), |next| next.span.start);
        let gap_start = fragment.span.end.min(gap_end);
        let after = &paragraph[gap_start..gap_end];
        let code = without_comments(paragraph, fragment.span, &comments);

        let marker = first_marker(after).filter(|m| !m.rhs.trim().is_empty());
        match (fragment.kind, marker) {
            (FragmentKind::Expression, Some(marker)) => {
                let lhs = code.trim_end_matches(';').trim_end().to_string();
                script.push(Operation::Assertion {
                    lhs,
                    rhs: marker.rhs.trim().to_string(),
                    line: line_at(gap_start + marker.offset),
                });
                dangling.extend(
                    all_markers(after)
                        .into_iter()
                        .filter(|&offset| offset > marker.offset)
                        .map(|offset| offset + gap_start),
                );
                continue;
            }
            (FragmentKind::Import, _) => {}
            (kind, _) => {
                let code = if kind == FragmentKind::Compound || code.ends_with(';') {
                    code
                } else {
                    format!("{};", code)
                };
                script.push(Operation::Statement { code });
            }
        }
        dangling.extend(all_markers(after).into_iter().map(|offset| offset + gap_start));
    }

    for offset in dangling {
        let line = line_at(offset);
        match policy {
            DanglingMarkers::Ignore => {}
            DanglingMarkers::Warn => warnings.push(Warning {
                line,
                message: "assertion marker has no expression to check".to_string(),
            }),
            DanglingMarkers::Error => return Err(ScriptError::DanglingMarker { line }),
        }
    }
    Ok(script)
}

/// Source text of `span` with the comments inside it cut out.
fn without_comments(source: &str, span: Span, comments: &[Span]) -> String {
    let mut out = String::new();
    let mut pos = span.start;
    for comment in comments.iter().filter(|c| c.start >= span.start && c.end <= span.end) {
        out.push_str(&source[pos..comment.start]);
        pos = comment.end;
    }
    out.push_str(&source[pos..span.end]);
    out.trim().to_string()
}
