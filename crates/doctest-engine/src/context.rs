// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexical context of a doc comment.

use serde::Serialize;

/// Where a comment was found. Built top-down: each scope copies its parent
/// and overrides the fields it knows about.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Context {
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    /// 0-based line in the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
}

impl Context {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self { file_path: file_path.into(), ..Self::default() }
    }

    pub fn with_class(&self, name: &str) -> Self {
        Self { class_name: Some(name.to_string()), ..self.clone() }
    }

    /// Replaces the function name, clearing it when `name` is `None`.
    pub fn with_function(&self, name: Option<&str>) -> Self {
        Self { function_name: name.map(str::to_string), ..self.clone() }
    }

    pub fn with_line(&self, line: usize) -> Self {
        Self { line_number: Some(line), ..self.clone() }
    }

    pub fn with_test_name(&self, name: impl Into<String>) -> Self {
        Self { test_name: Some(name.into()), ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_scopes_inherit_and_override() {
        let file = Context::new("src/a.ts");
        let class = file.with_class("A");
        let method = class.with_function(Some("run")).with_line(7);
        assert_eq!(method.class_name.as_deref(), Some("A"));
        assert_eq!(method.function_name.as_deref(), Some("run"));
        assert_eq!(method.line_number, Some(7));
        assert_eq!(method.file_path, "src/a.ts");
        assert_eq!(method.with_function(None).function_name, None);
        assert_eq!(file.class_name, None);
    }
}
