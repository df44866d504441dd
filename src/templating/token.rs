//! Parsing of placeholder token bodies.
//!
//! A token body is the text between `{{` and `}}`:
//!
//! ```text
//! path                      svc.layer0.fields.name.name
//! path:transform            organization.helperServices.geocode:defaultLocatorUrl
//! path||default             svc.url||https://example.com
//! path:transform||default
//! ```

/// A parsed placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Dotted dictionary path.
    pub path: &'a str,
    /// Explicit transform name given after `:`.
    pub transform: Option<&'a str>,
    /// Literal used when nothing else resolves.
    pub default: Option<&'a str>,
}

impl<'a> Token<'a> {
    /// Parse a token body. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(body: &'a str) -> Self {
        let (expression, default) = match body.split_once("||") {
            Some((expression, default)) => (expression, Some(default.trim())),
            None => (body, None),
        };
        let (path, transform) = match expression.split_once(':') {
            Some((path, transform)) => (path.trim(), Some(transform.trim())),
            None => (expression.trim(), None),
        };
        Self {
            path,
            transform: transform.filter(|t| !t.is_empty()),
            default,
        }
    }

    /// Split the final path segment off as a candidate transform suffix.
    #[must_use]
    pub fn suffix(&self) -> Option<(&'a str, &'a str)> {
        self.path.rsplit_once('.')
    }
}
