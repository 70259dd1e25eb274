// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration tree nodes.
//!
//! This is a structural view of a TypeScript file: enough to know which
//! declaration each doc comment documents and how declarations nest. It
//! does not model expressions or types.

use crate::Span;

/// A `/** ... */` comment attached to a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocComment {
    /// Span of the whole comment, delimiters included
    pub span: Span,
}

/// One item of a file or block, with everything nested inside it.
#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    /// Doc comments in the item's leading trivia, in source order
    pub docs: Vec<DocComment>,
    pub span: Span,
    /// Items found in brace blocks inside this one
    pub children: Vec<Decl>,
}

/// The closed set of item kinds the parser distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Class { name: Option<String> },
    Interface { name: String },
    /// `namespace A.B { }` or `module "m" { }`
    Namespace { name: String },
    Enum { name: String },
    TypeAlias { name: String },
    /// Function declaration; unnamed for `export default function () {}`
    Function { name: Option<String> },
    /// `const`/`let`/`var` statement; one entry per declarator, `None` for
    /// destructuring patterns
    Variable { names: Vec<Option<String>> },
    Constructor,
    /// Class/interface method or accessor; unnamed when the key is computed
    Method { name: Option<String> },
    /// Class/interface property, object-literal property or enum member
    Property { name: Option<String> },
    Import,
    /// Any other statement
    Statement,
    /// Holder for doc comments left at the end of a file
    EndOfFile,
}

impl DeclKind {
    /// The name this item declares, as the doc comment collector sees it.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            DeclKind::Class { name }
            | DeclKind::Function { name }
            | DeclKind::Method { name }
            | DeclKind::Property { name } => name.as_deref(),
            DeclKind::Interface { name }
            | DeclKind::Namespace { name }
            | DeclKind::Enum { name }
            | DeclKind::TypeAlias { name } => Some(name),
            DeclKind::Variable { names } => match names.as_slice() {
                [Some(name)] => Some(name),
                _ => None,
            },
            DeclKind::Constructor => Some("constructor"),
            DeclKind::Import | DeclKind::Statement | DeclKind::EndOfFile => None,
        }
    }

    /// Kinds that open a named scope for everything inside them.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            DeclKind::Class { .. } | DeclKind::Interface { .. } | DeclKind::Namespace { .. }
        )
    }
}
