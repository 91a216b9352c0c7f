//! Built-in marker tables.
//!
//! Each supported language has a flat list of substring markers and a list of
//! framework names. A marker contributes its weight once if it appears
//! anywhere in the text; the framework bonus is added once if any framework
//! name appears.

use dropship_core::Language;

/// A literal substring and the score it contributes when present.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub marker: &'static str,
    pub weight: u32,
}

const fn rule(marker: &'static str) -> Rule {
    Rule { marker, weight: 1 }
}

#[derive(Debug)]
pub struct LanguageRules {
    pub language: Language,
    pub markers: &'static [Rule],
    pub frameworks: &'static [&'static str],
    pub framework_bonus: u32,
}

impl LanguageRules {
    /// Score `text` against this table.
    pub fn score(&self, text: &str) -> u32 {
        let markers: u32 = self
            .markers
            .iter()
            .filter(|r| text.contains(r.marker))
            .map(|r| r.weight)
            .sum();
        let bonus = if self.frameworks.iter().any(|f| text.contains(f)) {
            self.framework_bonus
        } else {
            0
        };
        markers + bonus
    }
}

pub static PYTHON: LanguageRules = LanguageRules {
    language: Language::Python,
    markers: &[
        rule("def "),
        rule("import "),
        rule("from "),
        rule("print("),
        rule("class "),
        rule("if __name__"),
        rule("elif "),
        // Four-space indentation. Coarse: indented prose scores too.
        rule("    "),
        rule(".py"),
        // Block header terminator, e.g. `def f():` followed by a newline.
        rule("):\n"),
    ],
    frameworks: &["flask", "Flask", "django"],
    framework_bonus: 2,
};

pub static JAVASCRIPT: LanguageRules = LanguageRules {
    language: Language::JavaScript,
    markers: &[
        rule("const "),
        rule("let "),
        rule("var "),
        rule("function "),
        rule("=>"),
        rule("console.log"),
        rule("require("),
        rule("import "),
        rule("export "),
        rule(".js"),
    ],
    frameworks: &["express", "Express", "React"],
    framework_bonus: 2,
};

/// Language picked when neither table wins outright.
pub const DEFAULT_LANGUAGE: Language = Language::JavaScript;
