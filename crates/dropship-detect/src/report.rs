//! Human-readable classification report.

use crate::Classification;

pub fn format_report(c: &Classification) -> String {
    let mut out = String::new();

    out.push_str(&format!("Language:   {}\n", c.language));
    out.push_str(&format!("Python:     {}\n", c.python_score));
    out.push_str(&format!("JavaScript: {}\n", c.javascript_score));
    if c.is_tie() {
        out.push_str("\nScores tied; the default language was used.\n");
    }

    out
}
