// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration exposer: relaxes `private`/`protected` so tests can reach them.

use doctest_ast::token::{Token, TokenKind};
use doctest_lexer::Lexer;
use doctest_parser::Parser;

use crate::error::EngineError;

const RESTRICTED: [&str; 2] = ["private", "protected"];

/// Rewrite every restricted member modifier of `source` to `public`.
///
/// The file must parse; everything but the modifiers is kept byte for byte.
pub fn expose_privates(source: &str) -> Result<String, EngineError> {
    let lexed = Lexer::new(source).tokenize();
    if let Some(error) = lexed.errors.into_iter().next() {
        return Err(EngineError::lex(source, error));
    }
    let parsed = Parser::new(lexed.tokens.clone()).parse();
    if let Some(error) = parsed.errors.into_iter().next() {
        return Err(EngineError::parse(source, error));
    }
    Ok(relax(source, &lexed.tokens))
}

pub(crate) fn relax(source: &str, tokens: &[Token]) -> String {
    let significant: Vec<&Token> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;

    for (i, token) in significant.iter().enumerate() {
        if !RESTRICTED.iter().any(|word| token.kind.is_word(word)) {
            continue;
        }
        let after_access = i > 0 && matches!(significant[i - 1].kind, TokenKind::Dot | TokenKind::QuestionDot);
        let modifies_member = significant.get(i + 1).is_some_and(|next| starts_member(&next.kind));
        if after_access || !modifies_member {
            continue;
        }
        out.push_str(&source[pos..token.span.start]);
        out.push_str("public");
        pos = token.span.end;
    }
    out.push_str(&source[pos..]);
    out
}

/// Tokens that can follow a modifier: a name, another modifier, or a key.
fn starts_member(kind: &TokenKind) -> bool {
    kind.word().is_some()
        || matches!(
            kind,
            TokenKind::LBracket | TokenKind::PrivateName(_) | TokenKind::Str(_) | TokenKind::Number
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaxes_member_modifiers() {
        let src = "class A {\n  private x = 1\n  protected static y() {}\n  constructor(private readonly z: number) {}\n}";
        assert_eq!(
            expose_privates(src).expect("exposed"),
            "class A {\n  public x = 1\n  public static y() {}\n  constructor(public readonly z: number) {}\n}"
        );
    }

    #[test]
    fn keeps_everything_else() {
        let src = "// private notes\nclass B {\n  #private = 1 /* private */\n  private(): string { return \"private x\" }\n  m() { return this.private + o.protected }\n}\nconst o = { private: 1, protected: 2 }\n";
        assert_eq!(expose_privates(src).expect("exposed"), src);
    }

    #[test]
    fn unparsable_source_fails() {
        assert!(matches!(expose_privates("class A {\n  private x\n"), Err(EngineError::Parse { .. })));
        assert!(matches!(expose_privates("const s = \"open\n"), Err(EngineError::Lex { line: 0, .. })));
    }
}
