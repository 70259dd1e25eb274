// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Comment collector: every doc comment of a file with its lexical context.

use doctest_ast::decl::Decl;
use doctest_ast::LineMap;

use crate::context::Context;
use crate::jsdoc;

/// Text of one doc comment, or of one of its tags, and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub text: String,
    /// `line_number` is the file line of the text's first line
    pub context: Context,
}

/// Collect the doc comments of a parsed file in document order.
pub fn collect_comments(decls: &[Decl], source: &str, file_path: &str) -> Vec<CommentRecord> {
    let lines = LineMap::new(source);
    let root = Context::new(file_path);
    decls
        .iter()
        .flat_map(|decl| collect_decl(decl, &root, source, &lines))
        .collect()
}

fn collect_decl(decl: &Decl, context: &Context, source: &str, lines: &LineMap) -> Vec<CommentRecord> {
    let mut scope = match decl.kind.declared_name() {
        Some(name) if decl.kind.is_class_like() => context.with_class(name),
        _ => context.clone(),
    };

    let mut records = Vec::new();
    if !decl.docs.is_empty() {
        scope = scope.with_function(decl.kind.declared_name());
        for doc in &decl.docs {
            let first_line = lines.line_of(doc.span.start);
            records.extend(
                jsdoc::doc_texts(doc.span.text(source), first_line)
                    .into_iter()
                    .map(|piece| CommentRecord { text: piece.text, context: scope.with_line(piece.line) }),
            );
        }
    }

    for child in &decl.children {
        records.extend(collect_decl(child, &scope, source, lines));
    }
    records
}
