//! Single-value text templates
//!
//! A template is literal text with `{{.}}` placeholders. Every placeholder
//! is replaced by the same value; there are no named fields. Whitespace
//! inside the braces is allowed (`{{ . }}`).

use std::ops::Range;

/// Token representing a parsed template fragment
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Literal text (range in the source)
    Literal(Range<usize>),
    /// `{{.}}`
    Value,
}

/// A parsed template, ready to render
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
}

impl Template {
    /// Parse `source`, rejecting unclosed or unsupported actions
    pub fn parse(source: impl Into<String>) -> Result<Self, String> {
        let source = source.into();
        let tokens = tokenize(&source)?;
        Ok(Self { source, tokens })
    }

    /// Number of placeholders in the template
    pub fn placeholders(&self) -> usize {
        self.tokens.iter().filter(|t| **t == Token::Value).count()
    }

    /// Substitute `value` into every placeholder
    pub fn render(&self, value: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + value.len());
        for token in &self.tokens {
            match token {
                Token::Literal(range) => out.push_str(&self.source[range.clone()]),
                Token::Value => out.push_str(value),
            }
        }
        out
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find("{{") {
        let open = cursor + offset;
        let body_start = open + 2;

        let Some(close) = source[body_start..].find("}}") else {
            return Err(format!("unclosed action at byte {}", open));
        };
        let body = source[body_start..body_start + close].trim();
        if body != "." {
            return Err(format!(
                "unsupported action {{{{{}}}}} at byte {}, only {{{{.}}}} is allowed",
                body, open
            ));
        }

        if open > literal_start {
            tokens.push(Token::Literal(literal_start..open));
        }
        tokens.push(Token::Value);

        cursor = body_start + close + 2;
        literal_start = cursor;
    }

    if literal_start < source.len() {
        tokens.push(Token::Literal(literal_start..source.len()));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_renders_single_placeholder() {
        let tmpl = Template::parse(r#"session.save_path = "{{.}}""#).unwrap();
        assert_eq!(tmpl.placeholders(), 1);
        assert_eq!(
            tmpl.render("tcp://localhost:6379"),
            r#"session.save_path = "tcp://localhost:6379""#
        );
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let tmpl = Template::parse("a={{ . }};").unwrap();
        assert_eq!(tmpl.render("x"), "a=x;");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let tmpl = Template::parse("session.save_handler = redis\n").unwrap();
        assert_eq!(tmpl.placeholders(), 0);
        assert_eq!(tmpl.render("ignored"), "session.save_handler = redis\n");
    }

    #[test]
    fn test_every_placeholder_gets_the_value() {
        let tmpl = Template::parse("{{.}}-{{.}}").unwrap();
        assert_eq!(tmpl.render("v"), "v-v");
    }

    #[test]
    fn test_value_is_not_reinterpreted() {
        let tmpl = Template::parse("[{{.}}]").unwrap();
        assert_eq!(tmpl.render("{{.}}"), "[{{.}}]");
    }

    #[test]
    fn test_unclosed_action_is_rejected() {
        let err = Template::parse("{{.").unwrap_err();
        assert!(err.contains("unclosed action"));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = Template::parse("{{.Hostname}}").unwrap_err();
        assert!(err.contains("unsupported action"));
    }
}
