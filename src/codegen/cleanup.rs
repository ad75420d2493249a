//! Textual cleanup of model output.
//!
//! Models tend to wrap code in markdown fences, sprinkle comments and lose
//! indentation. [`clean_output`] undoes all three with plain line-oriented
//! passes; it does not tokenize, so comment markers inside string literals
//! are stripped too.
//!
//! Every pass yields trimmed, non-empty lines before re-indenting, which
//! makes the whole pipeline idempotent.

use std::sync::LazyLock;

use regex::Regex;

use super::language::Language;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[^\n`]*\n?|\n?```").expect("fence pattern is valid"));

static HASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)#.*$").expect("hash comment pattern is valid"));

static SLASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("line comment pattern is valid"));

static SLASH_OR_BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)//.*$|/\*[\s\S]*?\*/").expect("block comment pattern is valid")
});

/// Python keywords that continue the enclosing block at its own level.
const CONTINUATIONS: [&str; 4] = ["else", "elif", "except", "finally"];

/// Python statements after which the current block is over.
const TERMINATORS: [&str; 5] = ["return", "break", "continue", "pass", "raise"];

/// Remove markdown fence markers, keeping the fenced content.
pub fn strip_fences(text: &str) -> String {
    FENCE.replace_all(text, "").into_owned()
}

/// Remove comments using the syntax of `language`.
pub fn strip_comments(text: &str, language: Language) -> String {
    let pattern = match language {
        Language::Python => &*HASH_COMMENT,
        Language::Go => &*SLASH_COMMENT,
        Language::TypeScript | Language::Java | Language::Cpp | Language::Rust => {
            &*SLASH_OR_BLOCK_COMMENT
        }
    };
    pattern.replace_all(text, "").into_owned()
}

fn leading_word(line: &str) -> &str {
    let end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    &line[..end]
}

/// Re-indent trimmed, non-empty `lines` with a single running level.
pub fn reindent<S: AsRef<str>>(lines: &[S], language: Language) -> Vec<String> {
    let unit = language.indent_unit();
    let mut level = 0usize;
    // Set when a Python block just ended on a terminator, so a following
    // `else:` is already at the right level.
    let mut block_closed = false;
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let line = line.as_ref();

        if language.uses_braces() {
            if line.starts_with('}') {
                level = level.saturating_sub(1);
            }
            out.push(format!("{}{line}", unit.repeat(level)));
            if line.ends_with('{') {
                level += 1;
            }
            continue;
        }

        let word = leading_word(line);
        if CONTINUATIONS.contains(&word) && !block_closed {
            level = level.saturating_sub(1);
        }
        out.push(format!("{}{line}", unit.repeat(level)));

        block_closed = false;
        if line.ends_with(':') {
            level += 1;
        } else if TERMINATORS.contains(&word) {
            level = level.saturating_sub(1);
            block_closed = true;
        }
    }

    out
}

/// Strip fences and comments, drop blank lines, re-indent for `language`.
pub fn clean_output(text: &str, language: Language) -> String {
    let text = strip_fences(text);
    let text = strip_comments(&text, language);

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    reindent(&lines, language)
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_with_language_tag() {
        let raw = "```python\nprint('hi')\n```";
        assert_eq!(strip_fences(raw), "print('hi')");
    }

    #[test]
    fn strips_bare_and_hyphenated_fences() {
        assert_eq!(strip_fences("```\nx = 1\n```\n"), "x = 1\n");
        assert_eq!(strip_fences("```objective-c\nint x;\n```"), "int x;");
    }

    #[test]
    fn strips_cpp_fence_tag() {
        assert_eq!(strip_fences("```c++\nint x;\n```"), "int x;");
        assert_eq!(strip_fences("```c#\nvar x = 1;\n```"), "var x = 1;");

        let out = clean_output(
            "```c++\n#include <vector>\nint main() {\nreturn 0;\n}\n```",
            Language::Cpp,
        );
        assert_eq!(out, "#include <vector>\nint main() {\n  return 0;\n}");
    }

    #[test]
    fn strips_python_comments() {
        let out = strip_comments("x = 1  # set x\n# whole line\ny = 2", Language::Python);
        assert_eq!(out, "x = 1  \n\ny = 2");
    }

    #[test]
    fn strips_line_and_block_comments() {
        let src = "let a = 1; // one\n/* multi\nline */let b = 2;";
        assert_eq!(strip_comments(src, Language::Rust), "let a = 1; \nlet b = 2;");
    }

    #[test]
    fn go_keeps_block_comments() {
        let src = "x := 1 // one\n/* kept */";
        assert_eq!(strip_comments(src, Language::Go), "x := 1 \n/* kept */");
    }

    #[test]
    fn reindents_braces() {
        let lines = ["fn main() {", "if x {", "y();", "} else {", "z();", "}", "}"];
        let out = reindent(&lines, Language::Rust);
        assert_eq!(
            out,
            vec![
                "fn main() {",
                "    if x {",
                "        y();",
                "    } else {",
                "        z();",
                "    }",
                "}",
            ]
        );
    }

    #[test]
    fn brace_widths_follow_language() {
        let lines = ["class A {", "int x;", "}"];
        assert_eq!(reindent(&lines, Language::Java)[1], "  int x;");
        assert_eq!(reindent(&lines, Language::Go)[1], "\tint x;");
    }

    #[test]
    fn stray_closing_brace_never_goes_negative() {
        let out = reindent(&["}", "}", "x"], Language::Cpp);
        assert_eq!(out, vec!["}", "}", "x"]);
    }

    #[test]
    fn reindents_python_blocks() {
        let lines = [
            "def f(x):",
            "if x:",
            "return 1",
            "else:",
            "return 2",
        ];
        let out = reindent(&lines, Language::Python);
        assert_eq!(
            out,
            vec![
                "def f(x):",
                "    if x:",
                "        return 1",
                "    else:",
                "        return 2",
            ]
        );
    }

    #[test]
    fn python_else_without_terminator_dedents() {
        let lines = ["if x:", "y = 1", "else:", "y = 2"];
        let out = reindent(&lines, Language::Python);
        assert_eq!(out, vec!["if x:", "    y = 1", "else:", "    y = 2"]);
    }

    #[test]
    fn python_try_except_finally() {
        let lines = ["try:", "run()", "except ValueError:", "pass", "finally:", "done()"];
        let out = reindent(&lines, Language::Python);
        assert_eq!(
            out,
            vec![
                "try:",
                "    run()",
                "except ValueError:",
                "    pass",
                "finally:",
                "    done()",
            ]
        );
    }

    #[test]
    fn python_terminator_closes_only_innermost_block() {
        // One dedent per terminator: a statement that belongs two levels up
        // stays at the inner block's level.
        let lines = ["def f(xs):", "for x in xs:", "if x:", "return x", "return None"];
        let out = reindent(&lines, Language::Python);
        assert_eq!(
            out,
            vec![
                "def f(xs):",
                "    for x in xs:",
                "        if x:",
                "            return x",
                "        return None",
            ]
        );
    }

    #[test]
    fn clean_output_full_pipeline() {
        let raw = "```rust\n// adds numbers\nfn add(a: i32, b: i32) -> i32 {\n\n   a + b   \n}\n```\n";
        assert_eq!(
            clean_output(raw, Language::Rust),
            "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}"
        );
    }

    #[test]
    fn clean_output_python() {
        let raw = "```python\ndef add(a, b):  # sum\n\n\n\n        return a + b\n```";
        assert_eq!(
            clean_output(raw, Language::Python),
            "def add(a, b):\n    return a + b"
        );
    }

    #[test]
    fn clean_output_removes_trailing_whitespace() {
        let out = clean_output("func main() {   \n\tx := 1\t\n}\t\n", Language::Go);
        assert!(out.lines().all(|l| l == l.trim_end()));
        assert_eq!(out, "func main() {\n\tx := 1\n}");
    }

    #[test]
    fn clean_output_is_idempotent() {
        let samples = [
            ("```python\nclass A:\ndef f(self):\nif self.x:\nreturn 1\nelse:\npass\n```", Language::Python),
            ("```ts\nfunction f() {\n// c\nreturn 1;\n}\n```", Language::TypeScript),
            ("```go\npackage main\nfunc main() {\nfmt.Println(1) // hi\n}\n```", Language::Go),
            ("#include <x>\nint main() {\n/* c */ return 0;\n}", Language::Cpp),
        ];
        for (raw, lang) in samples {
            let once = clean_output(raw, lang);
            assert_eq!(clean_output(&once, lang), once, "language: {lang}");
        }
    }

    #[test]
    fn clean_output_of_empty_input_is_empty() {
        assert_eq!(clean_output("", Language::Java), "");
        assert_eq!(clean_output("```\n```", Language::Java), "");
    }
}
