// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
///
/// Contextual TypeScript words (`interface`, `type`, `namespace`, `private`,
/// `get`, `let`, ...) stay `Ident` because they are valid names elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number,
    /// String literal; holds the raw text between the quotes
    Str(String),
    /// Template literal including any `${ ... }` parts
    Template,
    Regex,

    // Names
    Ident(String),
    /// `#name` class-private name
    PrivateName(String),

    // Reserved words
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,

    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Ellipsis,     // ...
    Dot,
    QuestionDot,  // ?.
    Colon,
    Question,
    Eq,
    FatArrow,     // =>
    Lt,
    Gt,
    Plus,
    Minus,
    Star,
    Slash,
    PlusPlus,
    MinusMinus,
    Bang,
    Tilde,
    At,
    /// Any other binary or assignment operator (`===`, `&&`, `+=`, `??`, ...)
    Operator,

    // Trivia
    Newline,
    LineComment,
    BlockComment,
    /// `/** ... */`
    DocComment,

    Eof,
}

impl TokenKind {
    /// Map a word to its reserved-word token, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        Some(match word {
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "debugger" => TokenKind::Debugger,
            "default" => TokenKind::Default,
            "delete" => TokenKind::Delete,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "enum" => TokenKind::Enum,
            "export" => TokenKind::Export,
            "extends" => TokenKind::Extends,
            "false" => TokenKind::False,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "in" => TokenKind::In,
            "instanceof" => TokenKind::Instanceof,
            "new" => TokenKind::New,
            "null" => TokenKind::Null,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "switch" => TokenKind::Switch,
            "this" => TokenKind::This,
            "throw" => TokenKind::Throw,
            "true" => TokenKind::True,
            "try" => TokenKind::Try,
            "typeof" => TokenKind::Typeof,
            "var" => TokenKind::Var,
            "void" => TokenKind::Void,
            "while" => TokenKind::While,
            "with" => TokenKind::With,
            _ => return None,
        })
    }

    /// The word spelled by an identifier or reserved-word token.
    pub fn word(&self) -> Option<&str> {
        Some(match self {
            TokenKind::Ident(name) => name.as_str(),
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Catch => "catch",
            TokenKind::Class => "class",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Debugger => "debugger",
            TokenKind::Default => "default",
            TokenKind::Delete => "delete",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Export => "export",
            TokenKind::Extends => "extends",
            TokenKind::False => "false",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::In => "in",
            TokenKind::Instanceof => "instanceof",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Return => "return",
            TokenKind::Super => "super",
            TokenKind::Switch => "switch",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::True => "true",
            TokenKind::Try => "try",
            TokenKind::Typeof => "typeof",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::With => "with",
            _ => return None,
        })
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.word() == Some(word)
    }

    /// Whitespace-like tokens the parser looks through.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::LineComment | TokenKind::BlockComment | TokenKind::DocComment
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment | TokenKind::DocComment)
    }

    /// True when a token of this kind can be the last token of an expression.
    /// After such a token a `/` divides; otherwise it starts a regex.
    pub fn ends_expression(&self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::Str(_)
                | TokenKind::Template
                | TokenKind::Regex
                | TokenKind::Ident(_)
                | TokenKind::PrivateName(_)
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }

    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number => "a number",
            TokenKind::Str(_) => "a string",
            TokenKind::Template => "a template literal",
            TokenKind::Regex => "a regular expression",
            TokenKind::Ident(_) => "a name",
            TokenKind::PrivateName(_) => "a private name",

            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Dot => "'.'",
            TokenKind::QuestionDot => "'?.'",
            TokenKind::Colon => "':'",
            TokenKind::Question => "'?'",
            TokenKind::Eq => "'='",
            TokenKind::FatArrow => "'=>'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Bang => "'!'",
            TokenKind::Tilde => "'~'",
            TokenKind::At => "'@'",
            TokenKind::Operator => "an operator",

            TokenKind::Newline => "end of line",
            TokenKind::LineComment | TokenKind::BlockComment => "a comment",
            TokenKind::DocComment => "a doc comment",
            TokenKind::Eof => "end of file",

            // Reserved words
            _ => "a keyword",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_word() {
        for word in ["class", "function", "import", "return", "typeof", "with"] {
            let kind = TokenKind::keyword(word).unwrap();
            assert_eq!(kind.word(), Some(word));
        }
        assert_eq!(TokenKind::keyword("interface"), None);
        assert!(TokenKind::Ident("private".into()).is_word("private"));
    }

    #[test]
    fn regex_position_follows_expression_end() {
        assert!(TokenKind::RParen.ends_expression());
        assert!(TokenKind::Ident("x".into()).ends_expression());
        assert!(!TokenKind::Return.ends_expression());
        assert!(!TokenKind::LParen.ends_expression());
        assert!(!TokenKind::RBrace.ends_expression());
    }
}
