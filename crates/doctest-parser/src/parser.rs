// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: a structural scan over significant tokens.
//!
//! Expressions and types are skipped rather than modelled. What the parser
//! decides is where each statement or member starts and ends, which name it
//! declares, which doc comments lead it, and which brace blocks nest inside.
//! Statement ends follow automatic semicolon insertion: a line break ends a
//! statement unless the tokens on either side of it continue the expression.

use doctest_ast::decl::{Decl, DeclKind, DocComment};
use doctest_ast::token::{Token, TokenKind};
use doctest_ast::Span;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Words that may prefix a class or object member.
const MEMBER_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "static", "readonly", "abstract", "override", "declare", "accessor",
    "async", "get", "set",
];

/// A significant token with the trivia in front of it folded in.
#[derive(Debug, Clone)]
struct Tok {
    kind: TokenKind,
    span: Span,
    /// A line break separates this token from the previous one
    newline_before: bool,
    /// Doc comments between the previous token and this one
    docs: Vec<DocComment>,
}

/// The kind of brace block items are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// A file or a statement block
    Block,
    /// Class or interface body
    Members,
    /// Object literal or object type
    Object,
    Enum,
}

/// Where a run of expression tokens stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    /// At `;` (consumed) or a line break the statement can't continue past
    Statement,
    /// Like `Statement`, but `,` and `;` stop it without being consumed
    List,
    /// Only at the enclosing closing bracket
    Group,
}

/// The parser for TypeScript source code.
pub struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut sig: Vec<Tok> = Vec::with_capacity(tokens.len());
        let mut newline = false;
        let mut docs = Vec::new();
        for token in tokens {
            match token.kind {
                TokenKind::Newline => newline = true,
                TokenKind::DocComment => docs.push(DocComment { span: token.span }),
                TokenKind::LineComment | TokenKind::BlockComment => {}
                kind => {
                    sig.push(Tok {
                        kind,
                        span: token.span,
                        newline_before: newline,
                        docs: std::mem::take(&mut docs),
                    });
                    newline = false;
                }
            }
        }
        if !matches!(sig.last(), Some(Tok { kind: TokenKind::Eof, .. })) {
            let end = sig.last().map_or(0, |t| t.span.end).max(docs.last().map_or(0, |d| d.span.end));
            sig.push(Tok {
                kind: TokenKind::Eof,
                span: Span::new(end, end),
                newline_before: newline,
                docs,
            });
        }
        Self { tokens: sig, pos: 0, errors: Vec::new() }
    }

    /// Parse a whole file into its top-level items.
    pub fn parse(&mut self) -> ParseResult {
        self.check_brackets();
        let decls = if self.errors.is_empty() {
            self.parse_items(Scope::Block)
        } else {
            Vec::new()
        };
        ParseResult {
            decls,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Every later decision skips over bracketed groups, so balance is
    /// checked once up front.
    fn check_brackets(&mut self) {
        let mut open: Vec<(TokenKind, Span)> = Vec::new();
        for tok in &self.tokens {
            if self.errors.len() >= MAX_ERRORS {
                return;
            }
            match tok.kind {
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => open.push((tok.kind.clone(), tok.span)),
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => match open.pop() {
                    Some((opener, _)) if closer_for(&opener) == tok.kind => {}
                    Some((opener, _)) => {
                        self.errors.push(ParseError::expected(closer_for(&opener).display_name(), &tok.kind, tok.span))
                    }
                    None => self.errors.push(ParseError::stray_closer(&tok.kind, tok.span)),
                },
                TokenKind::Eof => {
                    for (opener, span) in open.drain(..).rev().take(MAX_ERRORS) {
                        self.errors.push(ParseError::unclosed(&opener, span));
                    }
                }
                _ => {}
            }
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Tok {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    fn newline_before(&self, n: usize) -> bool {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)].newline_before
    }

    fn prev_kind(&self) -> Option<&TokenKind> {
        self.pos.checked_sub(1).map(|i| &self.tokens[i].kind)
    }

    fn at_end(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn check_word(&self, word: &str) -> bool {
        self.kind().is_word(word)
    }

    fn take_docs(&mut self) -> Vec<DocComment> {
        let i = self.pos.min(self.tokens.len() - 1);
        std::mem::take(&mut self.tokens[i].docs)
    }

    /// Span from the token at `start` to the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        let begin = self.tokens[start.min(self.tokens.len() - 1)].span.start;
        let end = self.pos.checked_sub(1).map_or(begin, |i| self.tokens[i].span.end);
        Span::new(begin, end.max(begin))
    }

    fn decl(&self, kind: DeclKind, start: usize, children: Vec<Decl>) -> Decl {
        Decl { kind, docs: Vec::new(), span: self.span_from(start), children }
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Read items until the closing `}` of the current block or end of file.
    fn parse_items(&mut self, scope: Scope) -> Vec<Decl> {
        let mut items = Vec::new();
        let mut docs = Vec::new();
        loop {
            docs.extend(self.take_docs());
            match self.kind() {
                TokenKind::Eof => {
                    if !docs.is_empty() {
                        let span = Span::new(docs[0].span.start, self.current().span.end);
                        items.push(Decl {
                            kind: DeclKind::EndOfFile,
                            docs: std::mem::take(&mut docs),
                            span,
                            children: Vec::new(),
                        });
                    }
                    break;
                }
                TokenKind::RBrace => break,
                TokenKind::Semi | TokenKind::Comma | TokenKind::RParen | TokenKind::RBracket => {
                    self.advance();
                    continue;
                }
                _ => {}
            }

            let start = self.pos;
            let mut item = match scope {
                Scope::Block => self.parse_statement(),
                Scope::Members => self.parse_member(),
                Scope::Object => self.parse_object_member(),
                Scope::Enum => self.parse_enum_member(),
            };
            if self.pos == start {
                self.advance();
                item.span = self.span_from(start);
            }
            item.docs = std::mem::take(&mut docs);
            items.push(item);
        }
        items
    }

    /// Read `{ items }` if the current token opens a block.
    fn parse_body(&mut self, scope: Scope) -> Vec<Decl> {
        if self.kind() != &TokenKind::LBrace {
            return Vec::new();
        }
        self.advance();
        let items = self.parse_items(scope);
        if self.kind() == &TokenKind::RBrace {
            self.advance();
        }
        items
    }

    fn parse_statement(&mut self) -> Decl {
        let start = self.pos;
        self.skip_decorators();
        let exported = self.skip_statement_modifiers();

        match self.kind().clone() {
            TokenKind::Class => return self.class_decl(start),
            TokenKind::Function => return self.function_decl(start),
            TokenKind::Enum => return self.enum_decl(start),
            TokenKind::Const if self.peek(1) == &TokenKind::Enum => {
                self.advance();
                return self.enum_decl(start);
            }
            TokenKind::Const | TokenKind::Var => return self.variable_decl(start),
            TokenKind::Import if !matches!(self.peek(1), TokenKind::LParen | TokenKind::Dot) => {
                self.advance();
                let children = self.scan_simple(End::Statement, start);
                return self.decl(DeclKind::Import, start, children);
            }
            TokenKind::Ident(word) => match word.as_str() {
                "let" if matches!(self.peek(1), TokenKind::Ident(_) | TokenKind::LBrace | TokenKind::LBracket) => {
                    return self.variable_decl(start);
                }
                "interface" if matches!(self.peek(1), TokenKind::Ident(_)) => return self.interface_decl(start),
                "namespace" | "module"
                    if matches!(self.peek(1), TokenKind::Ident(_) | TokenKind::Str(_)) && !self.newline_before(1) =>
                {
                    self.advance();
                    return self.namespace_decl(start);
                }
                "global" if self.peek(1) == &TokenKind::LBrace => return self.namespace_decl(start),
                "type" if matches!(self.peek(1), TokenKind::Ident(_)) && matches!(self.peek(2), TokenKind::Eq | TokenKind::Lt) => {
                    return self.type_alias(start);
                }
                _ if self.peek(1) == &TokenKind::Colon => {
                    // labeled statement
                    self.advance();
                    self.advance();
                    let children = self.parse_substatement();
                    return self.decl(DeclKind::Statement, start, children);
                }
                _ => {}
            },
            TokenKind::LBrace if !exported => {
                let children = self.parse_body(Scope::Block);
                return self.decl(DeclKind::Statement, start, children);
            }
            TokenKind::If
            | TokenKind::For
            | TokenKind::While
            | TokenKind::Do
            | TokenKind::Try
            | TokenKind::Switch
            | TokenKind::With => return self.compound_statement(start),
            _ => {}
        }

        let children = self.scan_simple(End::Statement, start);
        self.decl(DeclKind::Statement, start, children)
    }

    /// The body of `if`, `for`, `while` and friends: a block or one statement.
    fn parse_substatement(&mut self) -> Vec<Decl> {
        if self.kind() == &TokenKind::LBrace {
            self.parse_body(Scope::Block)
        } else if self.at_end() {
            Vec::new()
        } else {
            vec![self.parse_statement()]
        }
    }

    fn compound_statement(&mut self, start: usize) -> Decl {
        let mut children = Vec::new();
        match self.kind() {
            TokenKind::If => {
                self.advance();
                children.extend(self.scan_parens());
                children.extend(self.parse_substatement());
                if self.kind() == &TokenKind::Else {
                    self.advance();
                    children.extend(self.parse_substatement());
                }
            }
            TokenKind::For | TokenKind::While | TokenKind::With => {
                self.advance();
                if self.check_word("await") {
                    self.advance();
                }
                children.extend(self.scan_parens());
                children.extend(self.parse_substatement());
            }
            TokenKind::Do => {
                self.advance();
                children.extend(self.parse_substatement());
                if self.kind() == &TokenKind::While {
                    self.advance();
                    children.extend(self.scan_parens());
                }
                if self.kind() == &TokenKind::Semi {
                    self.advance();
                }
            }
            TokenKind::Try => {
                self.advance();
                children.extend(self.parse_body(Scope::Block));
                if self.kind() == &TokenKind::Catch {
                    self.advance();
                    children.extend(self.scan_parens());
                    children.extend(self.parse_body(Scope::Block));
                }
                if self.kind() == &TokenKind::Finally {
                    self.advance();
                    children.extend(self.parse_body(Scope::Block));
                }
            }
            TokenKind::Switch => {
                self.advance();
                children.extend(self.scan_parens());
                children.extend(self.parse_body(Scope::Block));
            }
            _ => {}
        }
        self.decl(DeclKind::Statement, start, children)
    }

    fn skip_decorators(&mut self) {
        while self.kind() == &TokenKind::At {
            self.advance();
            if self.kind().word().is_some() {
                self.advance();
                while self.kind() == &TokenKind::Dot && self.peek(1).word().is_some() {
                    self.advance();
                    self.advance();
                }
            }
            if self.kind() == &TokenKind::LParen {
                self.skip_balanced();
            }
        }
    }

    /// Skip `export`, `default`, `declare`, `abstract` and `async` in front of
    /// a statement. Returns true if the statement is exported.
    fn skip_statement_modifiers(&mut self) -> bool {
        let mut exported = false;
        loop {
            let next = self.peek(1);
            let skip = match self.kind() {
                TokenKind::Export => true,
                TokenKind::Default => exported,
                kind if kind.is_word("declare") => next.word().is_some() && !self.newline_before(1),
                kind if kind.is_word("abstract") => next == &TokenKind::Class,
                kind if kind.is_word("async") => next == &TokenKind::Function && !self.newline_before(1),
                _ => false,
            };
            if !skip {
                return exported;
            }
            if self.kind() == &TokenKind::Export {
                exported = true;
            }
            self.advance();
        }
    }

    fn skip_member_modifiers(&mut self) {
        while self.kind().word().is_some_and(|w| MEMBER_MODIFIERS.contains(&w))
            && self.starts_member_key(1)
            && !self.newline_before(1)
        {
            self.advance();
        }
    }

    fn starts_member_key(&self, n: usize) -> bool {
        let kind = self.peek(n);
        kind.word().is_some()
            || matches!(
                kind,
                TokenKind::Str(_) | TokenKind::Number | TokenKind::PrivateName(_) | TokenKind::LBracket | TokenKind::Star
            )
    }

    /// Read a property key. Numeric and computed keys have no name.
    fn member_key(&mut self) -> Option<String> {
        match self.kind().clone() {
            TokenKind::Str(s) => {
                self.advance();
                Some(s)
            }
            TokenKind::PrivateName(name) => {
                self.advance();
                Some(format!("#{}", name))
            }
            TokenKind::Number => {
                self.advance();
                None
            }
            TokenKind::LBracket => {
                self.skip_balanced();
                None
            }
            kind => {
                let name = kind.word()?.to_string();
                self.advance();
                Some(name)
            }
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn class_decl(&mut self, start: usize) -> Decl {
        self.advance(); // `class`
        let name = match self.kind() {
            TokenKind::Ident(n) if n != "implements" => {
                let n = n.clone();
                self.advance();
                Some(n)
            }
            _ => None,
        };
        self.skip_heritage();
        let children = self.parse_body(Scope::Members);
        self.decl(DeclKind::Class { name }, start, children)
    }

    fn interface_decl(&mut self, start: usize) -> Decl {
        self.advance(); // `interface`
        let name = self.kind().word().unwrap_or_default().to_string();
        self.advance();
        self.skip_heritage();
        let children = self.parse_body(Scope::Members);
        self.decl(DeclKind::Interface { name }, start, children)
    }

    /// `namespace A.B { }`, `module "m" { }` or `global { }`, with the
    /// introducing keyword already consumed.
    fn namespace_decl(&mut self, start: usize) -> Decl {
        let mut name = String::new();
        if let TokenKind::Str(s) = self.kind() {
            name = s.clone();
            self.advance();
        } else {
            while let Some(part) = self.kind().word() {
                name.push_str(part);
                self.advance();
                if self.kind() == &TokenKind::Dot && self.peek(1).word().is_some() {
                    name.push('.');
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let children = if self.kind() == &TokenKind::LBrace {
            self.parse_body(Scope::Block)
        } else {
            self.scan_simple(End::Statement, start)
        };
        self.decl(DeclKind::Namespace { name }, start, children)
    }

    fn enum_decl(&mut self, start: usize) -> Decl {
        self.advance(); // `enum`
        let name = self.kind().word().unwrap_or_default().to_string();
        self.advance();
        let children = self.parse_body(Scope::Enum);
        self.decl(DeclKind::Enum { name }, start, children)
    }

    fn type_alias(&mut self, start: usize) -> Decl {
        self.advance(); // `type`
        let name = self.kind().word().unwrap_or_default().to_string();
        self.advance();
        let children = self.scan_simple(End::Statement, start);
        self.decl(DeclKind::TypeAlias { name }, start, children)
    }

    /// Function declaration or expression.
    fn function_decl(&mut self, start: usize) -> Decl {
        self.advance(); // `function`
        if self.kind() == &TokenKind::Star {
            self.advance();
        }
        let name = match self.kind() {
            TokenKind::Ident(n) => {
                let n = n.clone();
                self.advance();
                Some(n)
            }
            _ => None,
        };
        let children = self.signature_and_body();
        self.decl(DeclKind::Function { name }, start, children)
    }

    fn variable_decl(&mut self, start: usize) -> Decl {
        self.advance(); // `const` / `let` / `var`
        let mut names = Vec::new();
        let mut children = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Ident(name) => {
                    names.push(Some(name.clone()));
                    self.advance();
                }
                TokenKind::LBrace | TokenKind::LBracket => {
                    self.skip_balanced();
                    names.push(None);
                }
                _ => break,
            }
            if self.kind() == &TokenKind::Bang {
                self.advance();
            }
            if self.kind() == &TokenKind::Colon {
                self.advance();
                self.skip_type(false);
            }
            children.extend(self.scan_simple(End::List, start));
            if self.kind() == &TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        if self.kind() == &TokenKind::Semi {
            self.advance();
        }
        self.decl(DeclKind::Variable { names }, start, children)
    }

    /// Type parameters, parameter list, return type and optional body of a
    /// function or method.
    fn signature_and_body(&mut self) -> Vec<Decl> {
        let mut children = Vec::new();
        if self.kind() == &TokenKind::Lt {
            self.skip_angles();
        }
        if self.kind() == &TokenKind::LParen {
            self.advance();
            children.extend(self.scan_group());
        }
        if self.kind() == &TokenKind::Colon {
            self.advance();
            self.skip_type(true);
        }
        if self.kind() == &TokenKind::LBrace {
            children.extend(self.parse_body(Scope::Block));
        } else if self.kind() == &TokenKind::Semi {
            self.advance();
        }
        children
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn parse_member(&mut self) -> Decl {
        let start = self.pos;
        self.skip_decorators();
        if self.check_word("static") && self.peek(1) == &TokenKind::LBrace {
            self.advance();
            let children = self.parse_body(Scope::Block);
            return self.decl(DeclKind::Statement, start, children);
        }
        self.skip_member_modifiers();
        if self.kind() == &TokenKind::Star {
            self.advance();
        }
        let name = self.member_key();
        if matches!(self.kind(), TokenKind::Question | TokenKind::Bang) {
            self.advance();
        }
        if matches!(self.kind(), TokenKind::LParen | TokenKind::Lt) {
            let children = self.signature_and_body();
            let kind = if name.as_deref() == Some("constructor") {
                DeclKind::Constructor
            } else {
                DeclKind::Method { name }
            };
            return self.decl(kind, start, children);
        }
        let children = self.scan_simple(End::Statement, start);
        self.decl(DeclKind::Property { name }, start, children)
    }

    fn parse_object_member(&mut self) -> Decl {
        let start = self.pos;
        if self.kind() == &TokenKind::Ellipsis {
            self.advance();
            let children = self.scan_simple(End::List, start);
            self.skip_separator();
            return self.decl(DeclKind::Statement, start, children);
        }
        self.skip_member_modifiers();
        if self.kind() == &TokenKind::Star {
            self.advance();
        }
        let name = self.member_key();
        if self.kind() == &TokenKind::Question {
            self.advance();
        }
        if matches!(self.kind(), TokenKind::LParen | TokenKind::Lt) {
            let children = self.signature_and_body();
            self.skip_separator();
            return self.decl(DeclKind::Method { name }, start, children);
        }
        let children = self.scan_simple(End::List, start);
        self.skip_separator();
        self.decl(DeclKind::Property { name }, start, children)
    }

    fn parse_enum_member(&mut self) -> Decl {
        let start = self.pos;
        let name = self.member_key();
        let children = self.scan_simple(End::List, start);
        self.skip_separator();
        self.decl(DeclKind::Property { name }, start, children)
    }

    fn skip_separator(&mut self) {
        if matches!(self.kind(), TokenKind::Comma | TokenKind::Semi) {
            self.advance();
        }
    }

    // =========================================================================
    // Expressions and types
    // =========================================================================

    /// Consume expression tokens up to `end`, collecting items declared in
    /// nested blocks, object literals, classes and functions. `from` is where
    /// the enclosing statement began.
    fn scan_simple(&mut self, end: End, from: usize) -> Vec<Decl> {
        let mut children = Vec::new();
        loop {
            if end != End::Group
                && self.pos > from
                && self.current().newline_before
                && self.line_break_ends_statement()
            {
                break;
            }
            match self.kind() {
                TokenKind::Eof | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => break,
                TokenKind::Semi if end == End::Statement => {
                    self.advance();
                    break;
                }
                TokenKind::Semi | TokenKind::Comma if end == End::List => break,
                TokenKind::LParen | TokenKind::LBracket => {
                    self.advance();
                    children.extend(self.scan_group());
                }
                TokenKind::LBrace => {
                    let scope = match self.prev_kind() {
                        Some(TokenKind::FatArrow | TokenKind::RParen) => Scope::Block,
                        _ => Scope::Object,
                    };
                    children.extend(self.parse_body(scope));
                }
                TokenKind::Class => {
                    let start = self.pos;
                    children.push(self.class_decl(start));
                }
                TokenKind::Function => {
                    let start = self.pos;
                    children.push(self.function_decl(start));
                }
                _ => self.advance(),
            }
        }
        children
    }

    /// Consume the rest of a `( ... )` or `[ ... ]` group whose opener was
    /// just consumed.
    fn scan_group(&mut self) -> Vec<Decl> {
        let children = self.scan_simple(End::Group, self.pos);
        if matches!(self.kind(), TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace) {
            self.advance();
        }
        children
    }

    fn scan_parens(&mut self) -> Vec<Decl> {
        if self.kind() != &TokenKind::LParen {
            return Vec::new();
        }
        self.advance();
        self.scan_group()
    }

    /// At a token that starts a new line: does the line break end the
    /// statement?
    fn line_break_ends_statement(&self) -> bool {
        let Some(prev) = self.prev_kind() else {
            return false;
        };
        let next = self.kind();
        if matches!(prev, TokenKind::Return | TokenKind::Break | TokenKind::Continue) {
            return true;
        }
        if matches!(next, TokenKind::PlusPlus | TokenKind::MinusMinus) {
            return true;
        }
        !(continues_after(prev) || continues_before(next))
    }

    /// Skip a type annotation. With `before_body` it stops at the `{` of a
    /// function body; otherwise at `=` or `,`. Both stop at the statement end.
    fn skip_type(&mut self, before_body: bool) {
        let start = self.pos;
        let mut angles = 0usize;
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::Semi | TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => return,
                TokenKind::Comma if angles == 0 => return,
                TokenKind::Eq if angles == 0 && !before_body => return,
                TokenKind::LBrace
                    if before_body && angles == 0 && self.pos > start && !self.prev_kind().is_some_and(opens_type) =>
                {
                    return
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    self.skip_balanced();
                    continue;
                }
                TokenKind::Lt => angles += 1,
                TokenKind::Gt => angles = angles.saturating_sub(1),
                _ if angles == 0
                    && self.pos > start
                    && self.current().newline_before
                    && self.line_break_ends_statement() =>
                {
                    return
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip type parameters and `extends`/`implements` clauses up to a body.
    fn skip_heritage(&mut self) {
        let mut angles = 0usize;
        loop {
            match self.kind() {
                TokenKind::LBrace if angles == 0 => return,
                TokenKind::Eof | TokenKind::Semi | TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    self.skip_balanced();
                    continue;
                }
                TokenKind::Lt => angles += 1,
                TokenKind::Gt => angles = angles.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip a `< ... >` type parameter list.
    fn skip_angles(&mut self) {
        let mut angles = 0usize;
        loop {
            match self.kind() {
                TokenKind::Lt => angles += 1,
                TokenKind::Gt => {
                    angles = angles.saturating_sub(1);
                    if angles == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    self.skip_balanced();
                    continue;
                }
                TokenKind::Eof | TokenKind::Semi | TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip one token, or a whole bracketed group when at an opener.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::Eof => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
            if depth == 0 {
                return;
            }
        }
    }
}

fn closer_for(opener: &TokenKind) -> TokenKind {
    match opener {
        TokenKind::LParen => TokenKind::RParen,
        TokenKind::LBracket => TokenKind::RBracket,
        _ => TokenKind::RBrace,
    }
}

/// A line ending in one of these tokens continues on the next line.
fn continues_after(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Operator
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::FatArrow
            | TokenKind::Dot
            | TokenKind::QuestionDot
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Question
            | TokenKind::Lt
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::Ellipsis
            | TokenKind::At
            | TokenKind::Extends
            | TokenKind::In
            | TokenKind::Instanceof
            | TokenKind::New
            | TokenKind::Typeof
            | TokenKind::Void
            | TokenKind::Delete
    ) || kind.is_word("as")
        || kind.is_word("satisfies")
        || kind.is_word("keyof")
}

/// A line starting with one of these tokens continues the previous line.
fn continues_before(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Operator
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::FatArrow
            | TokenKind::Dot
            | TokenKind::QuestionDot
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Question
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Template
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::In
            | TokenKind::Instanceof
    ) || kind.is_word("as")
        || kind.is_word("satisfies")
}

/// After these tokens a `{` opens an object type, not a function body.
fn opens_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Colon
            | TokenKind::Operator
            | TokenKind::Lt
            | TokenKind::Comma
            | TokenKind::FatArrow
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Question
            | TokenKind::Eq
            | TokenKind::Extends
            | TokenKind::Typeof
    ) || kind.is_word("keyof")
        || kind.is_word("infer")
        || kind.is_word("readonly")
}

// =============================================================================
// Fragments
// =============================================================================

/// One top-level statement of a code snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    /// From the first to the last token of the statement, `;` included;
    /// surrounding comments excluded
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Expression statement, the only kind an assertion can check
    Expression,
    /// `const`, `let`, `var` or `type`
    Declaration,
    /// Statement ending in a block: `if`, loops, `try`, `switch`, blocks,
    /// labels, and function, class, interface, enum and namespace declarations
    Compound,
    /// Static `import`
    Import,
    /// `return`, `throw`, `export ...` and other simple statements
    Statement,
}

/// Split a snippet's tokens into its top-level statements.
pub fn split_fragments(tokens: Vec<Token>) -> Result<Vec<Fragment>, ParseError> {
    let mut parser = Parser::new(tokens);
    parser.check_brackets();
    if !parser.errors.is_empty() {
        return Err(parser.errors.swap_remove(0));
    }

    let mut fragments = Vec::new();
    loop {
        while parser.kind() == &TokenKind::Semi {
            parser.advance();
        }
        if parser.at_end() {
            break;
        }
        let start = parser.pos;
        let decl = parser.parse_statement();
        if parser.pos == start {
            parser.advance();
        }
        fragments.push(Fragment {
            kind: parser.fragment_kind(&decl.kind, start),
            span: parser.span_from(start),
        });
    }
    Ok(fragments)
}

impl Parser {
    fn fragment_kind(&self, kind: &DeclKind, start: usize) -> FragmentKind {
        match kind {
            DeclKind::Import => FragmentKind::Import,
            DeclKind::Variable { .. } | DeclKind::TypeAlias { .. } => FragmentKind::Declaration,
            DeclKind::Statement => {
                let first = &self.tokens[start].kind;
                match first {
                    TokenKind::If
                    | TokenKind::For
                    | TokenKind::While
                    | TokenKind::Do
                    | TokenKind::Try
                    | TokenKind::Switch
                    | TokenKind::With
                    | TokenKind::LBrace => FragmentKind::Compound,
                    TokenKind::Ident(_) if self.tokens.get(start + 1).is_some_and(|t| t.kind == TokenKind::Colon) => {
                        FragmentKind::Compound
                    }
                    TokenKind::Return
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Throw
                    | TokenKind::Debugger
                    | TokenKind::Export
                    | TokenKind::At => FragmentKind::Statement,
                    _ if first.is_word("declare") => FragmentKind::Statement,
                    _ => FragmentKind::Expression,
                }
            }
            _ => FragmentKind::Compound,
        }
    }
}

// =============================================================================
// Results and errors
// =============================================================================

/// Result of parsing: declarations plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub decls: Vec<Decl>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn unclosed(opener: &TokenKind, span: Span) -> Self {
        let closer = closer_for(opener);
        let mut error = Self::expected(closer.display_name(), &TokenKind::Eof, span);
        error.message = format!("Unclosed {} - missing {}", opener.display_name(), closer.display_name());
        error
    }

    fn stray_closer(found: &TokenKind, span: Span) -> Self {
        Self {
            span,
            message: format!("Unexpected {}", found.display_name()),
            hint: crate::hints::for_expected("opening bracket", found).map(String::from),
        }
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "'}'" => format!("Expected '}}' to close block, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
