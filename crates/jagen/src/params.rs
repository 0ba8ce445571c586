//! Parameter extraction strategies
//!
//! Sources carry real parameter names; javap dumps only carry the (erased)
//! types. The parser is generic over a [`ParameterExtractor`] so the same
//! statement machinery serves both.

use crate::parser_types::{Param, Params};
use crate::tokens::Tokens;

/// Modifiers skipped when looking for a member's type token
const JAVA_KEYWORDS: &[&str] = &[
    "final",
    "static",
    "abstract",
    "public",
    "synchronized",
    "native",
    "default",
    "strictfp",
    "transient",
    "volatile",
];

pub fn is_java_keyword(token: &str) -> bool {
    JAVA_KEYWORDS.contains(&token)
}

/// Turns the tokens of a constructor or method statement into its parameters
pub trait ParameterExtractor {
    fn params(&self, tokens: &Tokens) -> Params;
}

/// Non-keyword tokens between the first `(` and its matching `)`
///
/// Nested parentheses, such as annotation arguments, are skipped along with
/// everything inside them.
pub fn param_words(tokens: &Tokens) -> Vec<&str> {
    let Some(open) = tokens.find("(") else {
        return Vec::new();
    };

    let mut depth = 0usize;
    let mut words = Vec::new();
    for token in &tokens.as_slice()[open + 1..] {
        match token.as_str() {
            "(" => depth += 1,
            ")" if depth == 0 => break,
            ")" => depth -= 1,
            word if depth == 0 && !is_java_keyword(word) => words.push(word),
            _ => {}
        }
    }
    words
}

/// Reads `Type name` pairs from Java source
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceParams;

impl ParameterExtractor for SourceParams {
    fn params(&self, tokens: &Tokens) -> Params {
        let mut words = param_words(tokens)
            .into_iter()
            .filter(|t| !t.starts_with('@'));
        let mut params = Vec::new();

        while let Some(java_type) = words.next() {
            let mut java_type = java_type.to_string();
            let mut name = words.next();

            // `String ... args`
            if name == Some("...") {
                java_type.push_str("...");
                name = words.next();
            }
            let Some(mut name) = name else {
                log::debug!("dangling parameter type '{}'", java_type);
                break;
            };

            // `String args[]`
            while let Some(stripped) = name.strip_suffix("[]") {
                java_type.push_str("[]");
                name = stripped;
            }

            params.push(Param::new(name, java_type));
        }

        Params(params)
    }
}

/// Synthesizes names for the bare types listed by javap
#[derive(Debug, Clone, Copy, Default)]
pub struct DisassemblyParams;

impl ParameterExtractor for DisassemblyParams {
    fn params(&self, tokens: &Tokens) -> Params {
        param_words(tokens)
            .into_iter()
            .enumerate()
            .map(|(i, java_type)| Param::new(placeholder_name(i), java_type))
            .collect()
    }
}

/// `a`, `b`, ... `z`, then `a1`, `b1`, ...
fn placeholder_name(index: usize) -> String {
    let letter = (b'a' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        round => format!("{}{}", letter, round),
    }
}
