//! Keyword-based target language detection.
//!
//! The table is walked in order and the first language with any keyword
//! contained in the lower-cased prompt wins. Keywords are plain substrings,
//! so earlier rows shadow later ones (`"function "` claims a prompt for
//! TypeScript before the C++ row is consulted).

use super::language::Language;

const KEYWORDS: [(Language, &[&str]); 6] = [
    (Language::Python, &["python", "py", "def ", "class ", ".py"]),
    (
        Language::TypeScript,
        &["typescript", "ts", "function ", "interface ", "type ", ".ts"],
    ),
    (Language::Java, &["java", "public class", "public static", ".java"]),
    (
        Language::Cpp,
        &["c++", "cpp", "vector<", "#include", ".cpp", ".hpp"],
    ),
    (Language::Rust, &["rust", "fn ", "struct ", "impl ", ".rs"]),
    (Language::Go, &["golang", "go", "func ", "package ", ".go"]),
];

/// Infer the target language of `prompt`, defaulting to Python.
pub fn detect_language(prompt: &str) -> Language {
    let lowered = prompt.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(lang, _)| *lang)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_language_by_name() {
        let cases = [
            ("Write a Python script that reverses a list", Language::Python),
            ("Create a TypeScript interface for a user", Language::TypeScript),
            ("Implement a Java method to reverse a string", Language::Java),
            ("reverse a linked list in C++", Language::Cpp),
            ("Implement a Rust iterator over a linked list", Language::Rust),
            ("Write a Golang HTTP handler", Language::Go),
        ];
        for (prompt, expected) in cases {
            assert_eq!(detect_language(prompt), expected, "prompt: {prompt}");
        }
    }

    #[test]
    fn detects_by_syntax_fragments() {
        assert_eq!(detect_language("write fn main"), Language::Rust);
        assert_eq!(detect_language("#include <vector> template"), Language::Cpp);
        assert_eq!(detect_language("Parse the input file.rs"), Language::Rust);
        assert_eq!(detect_language("Create an interface for shapes"), Language::TypeScript);
    }

    #[test]
    fn defaults_to_python() {
        assert_eq!(detect_language("sort a list"), Language::Python);
        assert_eq!(detect_language("compute fibonacci numbers"), Language::Python);
        assert_eq!(detect_language(""), Language::Python);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(detect_language("BUBBLE SORT IN RUST"), Language::Rust);
        assert_eq!(detect_language("Implement A Stack In JAVA"), Language::Java);
    }

    #[test]
    fn earlier_rows_take_precedence() {
        // "function " is a TypeScript keyword and is checked before C++.
        assert_eq!(
            detect_language("Write a C++ function using vector<int>"),
            Language::TypeScript
        );
        // "class " belongs to the Python row, ahead of Java's "public class".
        assert_eq!(detect_language("public class Foo"), Language::Python);
    }
}
