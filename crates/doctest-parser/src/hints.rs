// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.

use doctest_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on what was found instead.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Block hints
        ("'}'", TokenKind::Eof) => Some("every '{' needs a matching '}'"),
        ("'}'", _) => Some("a block or object literal is closed by the wrong bracket"),

        // Parentheses hints
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => Some("look for a missing ')' in the call or condition"),

        // Bracket hints
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),
        ("']'", _) => Some("look for a missing ']' in the array or index"),

        // Stray closers
        ("opening bracket", _) => Some("this closes a bracket that was never opened"),

        _ => None,
    }
}
