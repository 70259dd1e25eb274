// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use doctest_ast::token::{Token, TokenKind};
use doctest_ast::Span;
use logos::Logos;

/// Raw token type for logos - keywords and literal payloads are resolved in
/// a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\x0B\x0C]+")] // Skip horizontal whitespace (not newlines)
enum RawToken {
    #[token("\n")]
    #[token("\r\n")]
    #[token("\r")]
    Newline,

    // === Comments (kept: doc comments carry the doctests) ===
    #[regex(r"//[^\n\r]*")]
    LineComment,

    /// `true` when the comment is closed
    #[token("/*", block_comment)]
    BlockComment(bool),

    // === Literals ===
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?n?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+n?")]
    #[regex(r"0[bB][01_]+n?")]
    #[regex(r"0[oO][0-7_]+n?")]
    Number,

    #[regex(r#""([^"\\\n\r]|\\(.|\r?\n))*""#)]
    #[regex(r#"'([^'\\\n\r]|\\(.|\r?\n))*'"#)]
    Str,

    // Same as above without the closing quote; only wins when unclosed
    #[regex(r#""([^"\\\n\r]|\\(.|\r?\n))*"#)]
    #[regex(r#"'([^'\\\n\r]|\\(.|\r?\n))*"#)]
    UnterminatedStr,

    /// `true` when the template is closed
    #[token("`", template)]
    Template(bool),

    #[regex(r"#[a-zA-Z_$][a-zA-Z0-9_$]*")]
    PrivateName,

    // Reserved words are picked out of identifiers afterwards
    #[regex(r"([a-zA-Z_$]|[^\x00-\x7F])([a-zA-Z0-9_$]|[^\x00-\x7F])*")]
    Ident,

    // === Punctuation ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("?.")]
    QuestionDot,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("=>")]
    FatArrow,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("/=")]
    SlashEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("@")]
    At,

    // `>`-prefixed operators stay split so nested generics close
    #[token("==")]
    #[token("===")]
    #[token("!=")]
    #[token("!==")]
    #[token("<=")]
    #[token("<<")]
    #[token("<<=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("%")]
    #[token("%=")]
    #[token("**")]
    #[token("**=")]
    #[token("&")]
    #[token("&&")]
    #[token("&=")]
    #[token("&&=")]
    #[token("|")]
    #[token("||")]
    #[token("|=")]
    #[token("||=")]
    #[token("^")]
    #[token("^=")]
    #[token("??")]
    #[token("??=")]
    Operator,
}

/// Consume a block comment body up to and including `*/`.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> Option<bool> {
    match lexer.remainder().find("*/") {
        Some(i) => {
            lexer.bump(i + 2);
            Some(true)
        }
        None => {
            lexer.bump(lexer.remainder().len());
            Some(false)
        }
    }
}

/// Consume a template literal body, including nested `${ ... }` parts.
fn template(lexer: &mut logos::Lexer<RawToken>) -> Option<bool> {
    let (consumed, closed) = scan_template(lexer.remainder().as_bytes(), 0);
    lexer.bump(consumed);
    Some(closed)
}

/// Scan from just after an opening backtick. Returns the index after the
/// closing backtick and whether one was found.
fn scan_template(bytes: &[u8], mut i: usize) -> (usize, bool) {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return (i + 1, true),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                let (end, closed) = scan_substitution(bytes, i + 2);
                if !closed {
                    return (end, false);
                }
                i = end;
            }
            _ => i += 1,
        }
    }
    (bytes.len(), false)
}

/// Scan a `${ ... }` substitution from just after the `{`.
fn scan_substitution(bytes: &[u8], mut i: usize) -> (usize, bool) {
    let mut depth = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return (i, true);
                }
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'`' => {
                let (end, closed) = scan_template(bytes, i + 1);
                if !closed {
                    return (end, false);
                }
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    (bytes.len(), false)
}

/// Scan a regex body starting just after its opening `/`. Returns the
/// number of bytes up to and including the flags, or None if the line ends
/// first (then the `/` was a division after all).
fn scan_regex(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut in_class = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\r' => return None,
            b'\\' => {
                if matches!(bytes.get(i + 1), None | Some(b'\n') | Some(b'\r')) {
                    return None;
                }
                i += 2;
                continue;
            }
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                return Some(i);
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for TypeScript source code.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let base = self.body_start();
        let mut logos_lexer = RawToken::lexer(&self.source[base..]);
        let mut last_significant: Option<TokenKind> = None;
        // One entry per open `(`: true when it starts an `if`/`while`/`for`/`with` head.
        let mut parens: Vec<bool> = Vec::new();
        let mut closed_control_head = false;

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let kind = match result {
                Ok(raw @ (RawToken::Slash | RawToken::SlashEq)) => {
                    let regex_here = closed_control_head
                        || !last_significant.as_ref().is_some_and(TokenKind::ends_expression);
                    match scan_regex(logos_lexer.remainder()).filter(|_| regex_here) {
                        Some(len) => {
                            logos_lexer.bump(len);
                            TokenKind::Regex
                        }
                        None if raw == RawToken::Slash => TokenKind::Slash,
                        None => TokenKind::Operator,
                    }
                }
                Ok(raw) => {
                    let span = logos_lexer.span();
                    match self.convert_token(raw, logos_lexer.slice(), base + span.start, base + span.end) {
                        Ok(kind) => kind,
                        Err(e) => {
                            self.errors.push(e);
                            continue;
                        }
                    }
                }
                Err(()) => {
                    let start = base + logos_lexer.span().start;
                    let ch = self.source[start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, start));
                    continue;
                }
            };

            let span = logos_lexer.span();
            if !kind.is_trivia() {
                closed_control_head = false;
                match kind {
                    TokenKind::LParen => parens.push(matches!(
                        last_significant,
                        Some(TokenKind::If | TokenKind::While | TokenKind::For | TokenKind::With)
                    )),
                    TokenKind::RParen => closed_control_head = parens.pop().unwrap_or(false),
                    _ => {}
                }
                last_significant = Some(kind.clone());
            }
            tokens.push(Token {
                kind,
                span: Span::new(base + span.start, base + span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Offset of the first byte worth lexing: past a byte-order mark and a
    /// `#!` interpreter line.
    fn body_start(&self) -> usize {
        let mut start = 0;
        if self.source.starts_with('\u{FEFF}') {
            start = '\u{FEFF}'.len_utf8();
        }
        if self.source[start..].starts_with("#!") {
            start += self.source[start..].find('\n').unwrap_or(self.source.len() - start);
        }
        start
    }

    /// Convert a raw logos token to our TokenKind.
    fn convert_token(&self, raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
        Ok(match raw {
            RawToken::Newline => TokenKind::Newline,
            RawToken::LineComment => TokenKind::LineComment,
            RawToken::BlockComment(false) => return Err(LexError::unterminated_comment(start, end)),
            RawToken::BlockComment(true) => {
                if slice.len() > 4 && slice.starts_with("/**") {
                    TokenKind::DocComment
                } else {
                    TokenKind::BlockComment
                }
            }

            RawToken::Number => TokenKind::Number,
            RawToken::Str => TokenKind::Str(slice[1..slice.len() - 1].to_string()),
            RawToken::UnterminatedStr => return Err(LexError::unterminated_string(start, end)),
            RawToken::Template(true) => TokenKind::Template,
            RawToken::Template(false) => return Err(LexError::unterminated_template(start, end)),
            RawToken::PrivateName => TokenKind::PrivateName(slice[1..].to_string()),
            RawToken::Ident => TokenKind::keyword(slice).unwrap_or_else(|| TokenKind::Ident(slice.to_string())),

            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::Dot => TokenKind::Dot,
            RawToken::QuestionDot => TokenKind::QuestionDot,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Question => TokenKind::Question,
            RawToken::Eq => TokenKind::Eq,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::SlashEq => TokenKind::Operator,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::At => TokenKind::At,
            RawToken::Operator => TokenKind::Operator,
        })
    }
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated string".to_string(),
            hint: Some("add the closing quote before the end of the line".to_string()),
        }
    }

    fn unterminated_template(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated template literal".to_string(),
            hint: Some("add a closing '`'".to_string()),
        }
    }

    fn unterminated_comment(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated block comment".to_string(),
            hint: Some("add a closing '*/'".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    fn significant(src: &str) -> Vec<TokenKind> {
        kinds(src).into_iter().filter(|k| !k.is_trivia()).collect()
    }

    #[test]
    fn keywords_and_contextual_words() {
        assert_eq!(
            significant("class A { private x }"),
            vec![
                TokenKind::Class,
                TokenKind::Ident("A".into()),
                TokenKind::LBrace,
                TokenKind::Ident("private".into()),
                TokenKind::Ident("x".into()),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_and_newlines_are_kept() {
        assert_eq!(
            kinds("/** doc */\n// line\n/* block */ /**/"),
            vec![
                TokenKind::DocComment,
                TokenKind::Newline,
                TokenKind::LineComment,
                TokenKind::Newline,
                TokenKind::BlockComment,
                TokenKind::BlockComment,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_cover_source_text() {
        let src = "foo(\"a b\") // => 1";
        let result = Lexer::new(src).tokenize();
        let texts: Vec<&str> = result.tokens.iter().map(|t| t.span.text(src)).collect();
        assert_eq!(texts, vec!["foo", "(", "\"a b\"", ")", "// => 1", ""]);
    }

    #[test]
    fn regex_versus_division() {
        assert_eq!(
            significant("a / b"),
            vec![TokenKind::Ident("a".into()), TokenKind::Slash, TokenKind::Ident("b".into()), TokenKind::Eof]
        );
        assert_eq!(
            significant("x = /ab+c/gi.test(s)")[2],
            TokenKind::Regex
        );
        assert_eq!(significant("s.replace(/=/g, '')")[4], TokenKind::Regex);
        assert_eq!(significant("f(/[/]/)")[2], TokenKind::Regex);
        assert_eq!(significant("(a) / 2")[3], TokenKind::Slash);
    }

    #[test]
    fn regex_after_control_head() {
        let result = Lexer::new(r"if (s) /a\/b/.test(s)").tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        assert_eq!(significant(r"if (s) /a\/b/.test(s)")[4], TokenKind::Regex);
        assert_eq!(significant("while (f(x)) /x/.exec(s)")[7], TokenKind::Regex);
        assert_eq!(significant("g(a) / 2")[4], TokenKind::Slash);
        assert_eq!(significant("if ((a) / 2) x")[5], TokenKind::Slash);
    }

    #[test]
    fn unclosed_regex_falls_back_to_division() {
        let result = Lexer::new("x = a\n/ 2").tokenize();
        assert!(result.is_ok());
        let result = Lexer::new("return / 2\n").tokenize();
        assert!(result.is_ok());
        assert!(result.tokens.iter().any(|t| t.kind == TokenKind::Slash));
    }

    #[test]
    fn template_with_nested_substitutions() {
        let src = "`a ${ {b: `c${d}`}.b } e` + 1";
        let toks = significant(src);
        assert_eq!(toks, vec![TokenKind::Template, TokenKind::Plus, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn numbers_and_operators() {
        assert_eq!(
            significant("0xFF === 1_000n ?? .5e3"),
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert_eq!(significant("a?.b")[1], TokenKind::QuestionDot);
        assert_eq!(significant("x => x")[1], TokenKind::FatArrow);
    }

    #[test]
    fn nested_generics_close_one_angle_at_a_time() {
        let toks = significant("Array<Array<number>>");
        assert_eq!(&toks[toks.len() - 3..], &[TokenKind::Gt, TokenKind::Gt, TokenKind::Eof]);
    }

    #[test]
    fn private_names_and_strings() {
        assert_eq!(
            significant("this.#count = 'it\\'s'"),
            vec![
                TokenKind::This,
                TokenKind::Dot,
                TokenKind::PrivateName("count".into()),
                TokenKind::Eq,
                TokenKind::Str("it\\'s".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn byte_order_mark_and_hashbang_are_skipped() {
        let src = "\u{FEFF}#!/usr/bin/env node\nlet x";
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok());
        assert_eq!(result.tokens[0].kind, TokenKind::Newline);
        assert_eq!(result.tokens[1].span.text(src), "let");
    }

    #[test]
    fn unterminated_literals_are_errors() {
        let result = Lexer::new("x = \"abc\ny").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Unterminated string");

        let result = Lexer::new("/* open").tokenize();
        assert_eq!(result.errors[0].message, "Unterminated block comment");

        let result = Lexer::new("`open ${x}").tokenize();
        assert_eq!(result.errors[0].message, "Unterminated template literal");
    }

    #[test]
    fn prose_apostrophe_is_reported_not_panicked() {
        let result = Lexer::new("don't do this").tokenize();
        assert!(!result.is_ok());
        assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }
}
