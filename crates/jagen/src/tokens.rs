//! Statement tokenizer

/// Tokens of one statement
///
/// Splits on spaces and commas, and emits `(` and `)` as tokens of their own.
/// Splitting is suspended inside `<...>` so a type such as
/// `java.util.Map<java.lang.String, java.lang.Integer>` stays a single token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    tokens: Vec<String>,
}

impl Tokens {
    pub fn parse(statement: &str) -> Self {
        let mut tokens = Vec::new();
        let mut token = String::new();
        let mut depth = 0usize;

        for c in statement.chars() {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                _ => {}
            }
            if depth != 0 {
                token.push(c);
                continue;
            }

            match c {
                ' ' | ',' => flush(&mut tokens, &mut token),
                '(' | ')' => {
                    flush(&mut tokens, &mut token);
                    tokens.push(c.to_string());
                }
                _ => token.push(c),
            }
        }
        flush(&mut tokens, &mut token);

        log::trace!("tokens: {:?}", tokens);

        Self { tokens }
    }

    /// Token at `i`, or `""` past the end
    pub fn get(&self, i: usize) -> &str {
        self.tokens.get(i).map_or("", String::as_str)
    }

    /// Position of the first token equal to `token`
    pub fn find(&self, token: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == token)
    }

    /// Position of the first token equal to `token` at or after `from`
    pub fn find_from(&self, from: usize, token: &str) -> Option<usize> {
        self.tokens
            .iter()
            .skip(from)
            .position(|t| t == token)
            .map(|pos| pos + from)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.find(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Drop leading annotations (`@Override`, `@SuppressWarnings("x")`)
    pub fn without_leading_annotations(&self) -> Tokens {
        let mut i = 0;
        while self.get(i).starts_with('@') {
            i += 1;
            if self.get(i) == "(" {
                match self.find_from(i, ")") {
                    Some(close) => i = close + 1,
                    None => i = self.tokens.len(),
                }
            }
        }
        Tokens {
            tokens: self.tokens[i.min(self.tokens.len())..].to_vec(),
        }
    }
}

fn flush(tokens: &mut Vec<String>, token: &mut String) {
    if !token.is_empty() {
        tokens.push(std::mem::take(token));
    }
}
