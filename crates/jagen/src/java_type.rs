//! Splitting of Java type expressions
//!
//! A type expression such as `java.util.Map<java.lang.String, java.util.List<Foo>>`
//! is split into its head (`java.util.Map`) followed by its type arguments.
//! Arguments that are themselves generic are returned verbatim (minus spaces)
//! so they can be split again by a later call.

/// Component used as head for varargs types (`T...`)
pub const VARARGS: &str = "...";
/// Component used as head for array types (`T[]`)
pub const ARRAY: &str = "[]";

/// Split a type expression into its head followed by its type arguments
///
/// - `T...` gives `["...", "T"]`
/// - `T[]` gives `["[]", "T"]`
/// - otherwise spaces are dropped and only the commas of the outermost
///   argument list split; nested generics are kept as one argument.
pub fn type_components(java_type: &str) -> Vec<String> {
    if let Some(element) = java_type.strip_suffix(VARARGS) {
        return vec![VARARGS.to_string(), element.to_string()];
    }
    if let Some(element) = java_type.strip_suffix(ARRAY) {
        return vec![ARRAY.to_string(), element.to_string()];
    }

    let mut components = Vec::new();
    let mut part = String::new();
    let mut depth = 0usize;

    for c in java_type.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '<' | '>' | ',' => {
                if c == '<' {
                    depth += 1;
                }
                // Inside a nested argument the delimiters belong to it
                if depth >= 2 {
                    part.push(c);
                }
                if c == '>' {
                    depth = depth.saturating_sub(1);
                }
                if depth < 2 && !part.is_empty() {
                    components.push(std::mem::take(&mut part));
                }
            }
            _ => part.push(c),
        }
    }

    if !part.is_empty() {
        components.push(part);
    }

    components
}

/// The head of a type expression, or `""` for an empty expression
pub fn type_head(java_type: &str) -> String {
    type_components(java_type)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Every head found by splitting `java_type` and, recursively, its arguments
///
/// `java.util.Map<java.lang.String, local.Bar[]>` gives
/// `["java.util.Map", "java.lang.String", "[]", "local.Bar"]`.
pub fn type_heads(java_type: &str) -> Vec<String> {
    let mut heads = Vec::new();
    collect_heads(java_type, &mut heads);
    heads
}

fn collect_heads(java_type: &str, heads: &mut Vec<String>) {
    let mut components = type_components(java_type).into_iter();
    if let Some(head) = components.next() {
        heads.push(head);
    }
    for argument in components {
        collect_heads(wildcard_bound(&argument).unwrap_or(&argument), heads);
    }
}

/// The bound of a wildcard type argument, as left by [`type_components`]
///
/// `?extendsX` and `?superX` give `Some("X")`, a bare `?` gives `Some("")`,
/// anything that is not a wildcard gives `None`.
pub fn wildcard_bound(argument: &str) -> Option<&str> {
    let rest = argument.strip_prefix('?')?;
    Some(
        rest.strip_prefix("extends")
            .or_else(|| rest.strip_prefix("super"))
            .unwrap_or(rest),
    )
}

/// Strip package qualifiers from every class name in a type expression
///
/// `java.util.Map<java.lang.String, java.lang.Integer>` gives
/// `Map<String,Integer>`. Whitespace is dropped so that javap and source
/// spellings of the same type compare equal.
pub fn simple_type_name(java_type: &str) -> String {
    let java_type = java_type.trim();
    if let Some(element) = java_type.strip_suffix(VARARGS) {
        return format!("{}{}", simple_type_name(element), VARARGS);
    }

    let mut out = String::with_capacity(java_type.len());
    let mut segment = String::new();

    for c in java_type.chars().filter(|c| !c.is_whitespace()) {
        if c == '.' {
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' || c == '$' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);

    out
}
