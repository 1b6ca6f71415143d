//! Naming templates for cascade folders and raw dumps
//!
//! A template is literal text with `{name}` or `{name:0N}` placeholders. The set of names is fixed
//! per use, and templates are checked once when the writer is created so a typo fails before any
//! input is read.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_]+)(?::0?(\d{1,2}))?\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template {template:?} uses unknown placeholder {{{name}}}; expected one of {expected}")]
    UnknownPlaceholder {
        template: String,
        name: String,
        expected: String,
    },
    #[error("template {template:?} has an unbalanced brace")]
    Unbalanced { template: String },
    #[error("template {template:?} renders to an empty name")]
    Empty { template: String },
}

/// A value substituted into a placeholder.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Int(u64),
    Text(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field { name: String, width: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse `source`, accepting only placeholders listed in `names`.
    pub fn parse(source: &str, names: &[&str]) -> Result<Self, TemplateError> {
        let mut pieces = Vec::new();
        let mut cursor = 0;
        for captures in PLACEHOLDER.captures_iter(source) {
            let whole = captures.get(0).map_or(0..0, |m| m.range());
            push_literal(&mut pieces, &source[cursor..whole.start], source)?;
            let name = &captures[1];
            if !names.contains(&name) {
                return Err(TemplateError::UnknownPlaceholder {
                    template: source.to_string(),
                    name: name.to_string(),
                    expected: names.join(", "),
                });
            }
            let width = captures
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            pieces.push(Piece::Field {
                name: name.to_string(),
                width,
            });
            cursor = whole.end;
        }
        push_literal(&mut pieces, &source[cursor..], source)?;
        if pieces.is_empty() {
            return Err(TemplateError::Empty {
                template: source.to_string(),
            });
        }
        Ok(Template { pieces })
    }

    /// Substitute every placeholder through `lookup`; unknown names render as nothing.
    pub fn render<'a>(&self, lookup: impl Fn(&str) -> Option<Arg<'a>>) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field { name, width } => match lookup(name) {
                    Some(Arg::Int(value)) => out.push_str(&format!("{value:0width$}")),
                    Some(Arg::Text(text)) => out.push_str(text),
                    None => {}
                },
            }
        }
        out
    }
}

fn push_literal(pieces: &mut Vec<Piece>, text: &str, source: &str) -> Result<(), TemplateError> {
    if text.contains(|c: char| c == '{' || c == '}') {
        return Err(TemplateError::Unbalanced {
            template: source.to_string(),
        });
    }
    if !text.is_empty() {
        pieces.push(Piece::Literal(text.to_string()));
    }
    Ok(())
}
