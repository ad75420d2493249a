//! Target language tag.

use std::fmt;

use serde::Serialize;

/// One of the six languages the relay knows how to prompt for and clean up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    TypeScript,
    Java,
    Cpp,
    Rust,
    Go,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
            Language::Go => "go",
        }
    }

    /// One level of indentation as emitted by the re-indenter.
    pub fn indent_unit(self) -> &'static str {
        match self {
            Language::Python | Language::Rust => "    ",
            Language::TypeScript | Language::Java | Language::Cpp => "  ",
            Language::Go => "\t",
        }
    }

    /// Whether blocks are delimited by `{` / `}` rather than `:` + indentation.
    pub fn uses_braces(self) -> bool {
        !matches!(self, Language::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
