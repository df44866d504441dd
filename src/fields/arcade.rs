//! Field references in Arcade expressions.
//!
//! Recognized notations, matched case-insensitively:
//!
//! ```text
//! $feature.FIELD
//! $feature["FIELD"]   $feature['FIELD']   $feature[FIELD]
//! $feature["RELATED.FIELD"]             (only FIELD is templatized)
//! "FIELD"  'FIELD'                      (quoted literals, e.g. in arrays)
//! ```

use regex::Regex;

use crate::placeholder::replace_outside_tokens;

/// Compiled Arcade patterns for one field.
#[derive(Debug, Clone)]
pub(crate) struct ArcadePatterns {
    dot: Regex,
    bracket: Regex,
    join: Regex,
    quoted: Regex,
}

impl ArcadePatterns {
    /// Compile the patterns for `field`; `None` if any pattern is invalid.
    pub(crate) fn new(field: &str) -> Option<Self> {
        let name = regex::escape(field);
        Some(Self {
            dot: Regex::new(&format!(r"(?i)\$feature\.{name}\b")).ok()?,
            bracket: Regex::new(&format!(r#"(?i)\$feature\[\s*(["']?){name}(["']?)\s*\]"#)).ok()?,
            join: Regex::new(&format!(r#"(?i)\$feature\[\s*(["'])(\w+)\.{name}(["'])\s*\]"#)).ok()?,
            quoted: Regex::new(&format!(r#"(?i)(["']){name}(["'])"#)).ok()?,
        })
    }

    /// Rewrite every reference to the field in `expression` with `token`.
    pub(crate) fn apply(&self, expression: &str, token: &str) -> String {
        let text = replace_outside_tokens(expression, &self.dot, |_| format!("$feature.{token}"));
        let text = replace_outside_tokens(&text, &self.bracket, |caps| {
            format!("$feature[{}{token}{}]", &caps[1], &caps[2])
        });
        let text = replace_outside_tokens(&text, &self.join, |caps| {
            format!("$feature[{}{}.{token}{}]", &caps[1], &caps[2], &caps[3])
        });
        replace_outside_tokens(&text, &self.quoted, |caps| {
            format!("{}{token}{}", &caps[1], &caps[2])
        })
    }
}
