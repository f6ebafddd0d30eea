//! Route templates with named placeholders, e.g. `/blocks/:height_or_hash`.
//!
//! A [`PathTemplate`] is parsed once and rendered many times, mirroring the
//! usual `compile(path)(params)` shape of route-template libraries.
//!
//! # Syntax
//!
//! ```text
//! /api/v2/addresses/:hash/tokens/:kind?
//!                   └───┘        └───┘
//!              required        optional (dropped with its leading '/')
//! ```
//!
//! Placeholder names are `[A-Za-z0-9_]+`.  Substituted values are escaped
//! the way `encodeURIComponent` escapes them, so a value can never introduce
//! a new path segment, a query string, or a fragment.  `.` and `..` are
//! rejected: URL resolution would collapse them into a different path.

use std::fmt;

use thiserror::Error;
use urlencoding::encode;

/// Errors raised while parsing a template or substituting values into it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathParamError {
    #[error("missing value for path placeholder ':{name}' in '{template}'")]
    Missing { name: String, template: String },

    #[error("path placeholder ':{name}' expects a single value, got a list")]
    NotScalar { name: String },

    #[error("empty value for path placeholder ':{name}'")]
    Empty { name: String },

    #[error("path placeholder ':{name}' cannot be the dot segment '{value}'")]
    DotSegment { name: String, value: String },

    #[error("invalid route template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// A value bound to a path placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathValue {
    Text(String),
    Number(i64),
    /// A composite value.  Always rejected; placeholders are scalar.
    List(Vec<String>),
}

impl From<&str> for PathValue {
    fn from(s: &str) -> Self {
        PathValue::Text(s.to_string())
    }
}

impl From<String> for PathValue {
    fn from(s: String) -> Self {
        PathValue::Text(s)
    }
}

impl From<i64> for PathValue {
    fn from(n: i64) -> Self {
        PathValue::Number(n)
    }
}

impl From<u32> for PathValue {
    fn from(n: u32) -> Self {
        PathValue::Number(n.into())
    }
}

impl From<Vec<String>> for PathValue {
    fn from(v: Vec<String>) -> Self {
        PathValue::List(v)
    }
}

/// Placeholder bindings, keyed by name.  Later inserts replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, PathValue)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PathValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PathValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PathValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<PathValue>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = PathParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder {
        name: String,
        /// `/` immediately before the placeholder; emitted only with a value.
        prefix: bool,
        optional: bool,
    },
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    tokens: Vec<Token>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self, PathParamError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c != ':' {
                literal.push(c);
                continue;
            }

            let mut name = String::new();
            while let Some(&(_, n)) = chars.peek() {
                if !is_name_char(n) {
                    break;
                }
                name.push(n);
                chars.next();
            }
            if name.is_empty() {
                return Err(PathParamError::InvalidTemplate {
                    template: template.to_string(),
                    reason: format!("missing placeholder name at offset {pos}"),
                });
            }

            let optional = matches!(chars.peek(), Some(&(_, '?')));
            if optional {
                chars.next();
            }

            let prefix = literal.ends_with('/');
            if prefix {
                literal.pop();
            }
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Token::Placeholder {
                name,
                prefix,
                optional,
            });
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            tokens,
        })
    }

    /// The template text this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in declaration order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Placeholder { name, .. } => Some(name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Whether any placeholder must be bound.
    pub fn has_required_placeholders(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, Token::Placeholder { optional: false, .. }))
    }

    /// Substitute `params` into the template.
    ///
    /// Bindings for names the template does not declare are ignored.
    pub fn render(&self, params: &PathParams) -> Result<String, PathParamError> {
        let mut out = String::with_capacity(self.source.len());

        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Placeholder {
                    name,
                    prefix,
                    optional,
                } => {
                    let value = match params.get(name) {
                        Some(PathValue::Text(s)) => s.clone(),
                        Some(PathValue::Number(n)) => n.to_string(),
                        Some(PathValue::List(_)) => {
                            return Err(PathParamError::NotScalar { name: name.clone() })
                        }
                        None if *optional => continue,
                        None => {
                            return Err(PathParamError::Missing {
                                name: name.clone(),
                                template: self.source.clone(),
                            })
                        }
                    };
                    if value.is_empty() {
                        return Err(PathParamError::Empty { name: name.clone() });
                    }
                    if value == "." || value == ".." {
                        return Err(PathParamError::DotSegment {
                            name: name.clone(),
                            value,
                        });
                    }
                    if *prefix {
                        out.push('/');
                    }
                    out.push_str(&encode(&value));
                }
            }
        }

        Ok(out)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, params: &PathParams) -> Result<String, PathParamError> {
        PathTemplate::parse(template).unwrap().render(params)
    }

    #[test]
    fn literal_only() {
        assert_eq!(
            render("/api/v2/blocks", &PathParams::new()).unwrap(),
            "/api/v2/blocks"
        );
    }

    #[test]
    fn substitutes_by_name_not_position() {
        let params = PathParams::new().with("b", "2").with("a", "1");
        assert_eq!(render("/x/:a/y/:b", &params).unwrap(), "/x/1/y/2");
    }

    #[test]
    fn numbers_render_as_decimal() {
        let params = PathParams::new().with("height", 12345_i64);
        assert_eq!(render("/blocks/:height", &params).unwrap(), "/blocks/12345");
    }

    #[test]
    fn values_are_escaped() {
        let params = PathParams::new().with("q", "a/b?c#d e");
        assert_eq!(
            render("/search/:q", &params).unwrap(),
            "/search/a%2Fb%3Fc%23d%20e"
        );
    }

    #[test]
    fn missing_required_value() {
        assert_eq!(
            render("/blocks/:height", &PathParams::new()),
            Err(PathParamError::Missing {
                name: "height".into(),
                template: "/blocks/:height".into(),
            })
        );
    }

    #[test]
    fn list_value_is_rejected() {
        let params = PathParams::new().with("hash", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            render("/tx/:hash", &params),
            Err(PathParamError::NotScalar {
                name: "hash".into()
            })
        );
    }

    #[test]
    fn empty_value_is_rejected() {
        let params = PathParams::new().with("hash", "");
        assert!(matches!(
            render("/tx/:hash", &params),
            Err(PathParamError::Empty { .. })
        ));
    }

    #[test]
    fn dot_segments_are_rejected() {
        for dots in [".", ".."] {
            let params = PathParams::new().with("hash", dots);
            assert_eq!(
                render("/addresses/:hash", &params),
                Err(PathParamError::DotSegment {
                    name: "hash".into(),
                    value: dots.into(),
                })
            );
        }
        let params = PathParams::new().with("hash", "...");
        assert_eq!(render("/addresses/:hash", &params).unwrap(), "/addresses/...");
    }

    #[test]
    fn optional_placeholder_drops_with_slash() {
        let t = PathTemplate::parse("/addresses/:hash/tokens/:kind?").unwrap();
        let params = PathParams::new().with("hash", "0xabc");
        assert_eq!(t.render(&params).unwrap(), "/addresses/0xabc/tokens");

        let params = params.with("kind", "erc20");
        assert_eq!(t.render(&params).unwrap(), "/addresses/0xabc/tokens/erc20");
    }

    #[test]
    fn placeholder_names_in_order() {
        let t = PathTemplate::parse("/:a/x/:b_2/:c?").unwrap();
        assert_eq!(t.placeholders().collect::<Vec<_>>(), ["a", "b_2", "c"]);
        assert!(t.has_required_placeholders());
        assert!(!PathTemplate::parse("/x/:c?")
            .unwrap()
            .has_required_placeholders());
    }

    #[test]
    fn colon_without_name_is_invalid() {
        assert!(matches!(
            PathTemplate::parse("/blocks/:/x"),
            Err(PathParamError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn later_insert_replaces_earlier() {
        let params = PathParams::new().with("a", "1").with("a", "2");
        assert_eq!(params.get("a"), Some(&PathValue::Text("2".into())));
        assert_eq!(params.iter().count(), 1);
    }
}
