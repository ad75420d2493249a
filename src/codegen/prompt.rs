//! Upstream prompt assembly.
//!
//! The user's request is wrapped in a short task header followed by a
//! `Requirements:` list. Sections are joined with blank lines.

use super::language::Language;

const SEPARATOR: &str = "\n\n";

fn language_requirements(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &[
            "Use type hints",
            "Follow PEP 8 style guide",
            "Include error handling",
            "Support async operations",
        ],
        Language::TypeScript => &[
            "Use type annotations",
            "Follow TypeScript conventions",
            "Include error handling",
            "Support async operations",
        ],
        Language::Java => &[
            "Use standard Java conventions",
            "Include error handling",
            "Support async operations",
        ],
        Language::Cpp => &[
            "Use standard C++ conventions",
            "Include error handling",
            "Support resource management",
        ],
        Language::Rust => &[
            "Use standard Rust conventions",
            "Include error handling",
            "Support async operations",
        ],
        Language::Go => &[
            "Use standard Go conventions",
            "Include error handling",
            "Support concurrent operations",
        ],
    }
}

fn indentation_hint(language: Language) -> &'static str {
    match language {
        Language::Python | Language::Rust => "Use proper indentation (4 spaces)",
        Language::TypeScript | Language::Java | Language::Cpp => {
            "Use proper indentation (2 spaces)"
        }
        Language::Go => "Use proper indentation (tabs)",
    }
}

/// Build the text sent to the model for `prompt` in `language`.
pub fn format_prompt(prompt: &str, language: Language) -> String {
    let mut requirements = vec![
        format!("Use {language}"),
        "Write clean, working code".to_string(),
    ];
    requirements.extend(language_requirements(language).iter().map(|r| r.to_string()));
    requirements.push(indentation_hint(language).to_string());
    requirements.push("Handle errors appropriately".to_string());
    requirements.push("Return only the implementation".to_string());

    let list = requirements
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    [
        format!("Write code for this task:\n{}", prompt.trim()),
        format!("Requirements:\n{list}"),
    ]
    .join(SEPARATOR)
}
