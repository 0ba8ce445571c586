//! Statement-driven class signature parser
//!
//! This is not a Java grammar. It relies on the input being regular,
//! well-formed javap output or source with a single public top-level type,
//! and pulls out just the package, class header, public constructors,
//! public methods and public static fields. Anything else is skipped.

use std::io::Read;

use crate::error::Result;
use crate::params::{is_java_keyword, ParameterExtractor};
use crate::parser_types::{ClassSigConstructor, ClassSigField, ClassSigMethod, ClassSignature};
use crate::statements::Statements;
use crate::tokens::Tokens;

/// Keywords introducing a type declaration
const TYPE_DECLARATIONS: &[&str] = &["class", "interface", "enum"];

/// Builds a [`ClassSignature`] from a comment-filtered statement stream
#[derive(Debug, Clone, Default)]
pub struct SignatureParser<P> {
    params: P,
}

impl<P: ParameterExtractor> SignatureParser<P> {
    pub fn new(params: P) -> Self {
        Self { params }
    }

    /// Parse comment-filtered input
    pub fn parse<R: Read + Send>(&self, input: R) -> Result<ClassSignature> {
        let signature = Statements::scan(input, |statements| self.parse_statements(statements))?;
        Ok(signature)
    }

    /// Parse from an already running statement stream
    pub fn parse_statements(&self, statements: &mut Statements) -> ClassSignature {
        let mut sig = ClassSignature::default();

        while let Some(statement) = statements.next() {
            let tokens = Tokens::parse(&statement.text);

            match tokens.get(0) {
                "package" => sig.package_name = tokens.get(1).to_string(),
                // `import static` brings in members, not types
                "import" if tokens.get(1) != "static" && !tokens.get(1).is_empty() => {
                    sig.imports.push(tokens.get(1).to_string());
                }
                _ => {}
            }

            if !tokens.contains("public") {
                continue;
            }

            let Some(declare_pos) = TYPE_DECLARATIONS.iter().find_map(|kw| tokens.find(kw)) else {
                continue;
            };

            let class_name = tokens.get(declare_pos + 1);
            if class_name.is_empty() {
                continue;
            }
            if class_name.contains('<') {
                log::debug!("skipping generic type declaration '{}'", class_name);
                continue;
            }

            sig.class_name = class_name.to_string();
            if let Some(pos) = tokens.find("extends") {
                sig.extends_name = tokens.get(pos + 1).to_string();
            }

            if statements.depth() > 0 {
                self.parse_members(&mut sig, statements);
                break;
            }
        }

        sig
    }

    /// Consume statements until the class body closes
    fn parse_members(&self, sig: &mut ClassSignature, statements: &mut Statements) {
        while statements.depth() > 0 {
            let Some(statement) = statements.next() else {
                break;
            };
            // Nested scopes: method bodies, inner classes, initializers
            if statement.depth > 2 {
                continue;
            }

            let tokens = Tokens::parse(&statement.text).without_leading_annotations();
            if tokens.get(0) != "public" {
                continue;
            }

            self.parse_member(sig, &tokens, &statement.text);
        }
    }

    fn parse_member(&self, sig: &mut ClassSignature, tokens: &Tokens, line: &str) {
        let Some(type_pos) = first_non_keyword(tokens) else {
            return;
        };
        let member_type = tokens.get(type_pos);

        if member_type.starts_with('<') && member_type.ends_with('>') {
            log::debug!("skipping generic member: {}", line);
            return;
        }
        if TYPE_DECLARATIONS.contains(&member_type) {
            log::debug!("skipping nested type: {}", line);
            return;
        }

        let is_static = tokens
            .find("static")
            .is_some_and(|static_pos| static_pos < type_pos);

        // A `(` after an `=` belongs to a field initializer
        let is_call = match (tokens.find("("), tokens.find("=")) {
            (Some(open), Some(assign)) => open < assign,
            (Some(_), None) => true,
            _ => false,
        };

        if is_call {
            if member_type == sig.class_name && !is_static && tokens.get(type_pos + 1) == "(" {
                sig.constructors.push(ClassSigConstructor {
                    params: self.params.params(tokens),
                    throws: throws(tokens),
                    line: line.to_string(),
                });
                return;
            }

            let name = tokens.get(type_pos + 1);
            if name.is_empty() || name == "(" || tokens.get(type_pos + 2) != "(" {
                log::debug!("skipping unrecognized member: {}", line);
                return;
            }

            sig.methods.push(ClassSigMethod {
                name: name.to_string(),
                params: self.params.params(tokens),
                return_type: member_type.to_string(),
                throws: throws(tokens),
                is_static,
                line: line.to_string(),
            });
        } else if is_static {
            let name = tokens.get(type_pos + 1);
            if name.is_empty() {
                return;
            }
            sig.fields.push(ClassSigField {
                name: name.to_string(),
                java_type: member_type.to_string(),
                is_static,
            });
        }
    }
}

fn first_non_keyword(tokens: &Tokens) -> Option<usize> {
    tokens
        .as_slice()
        .iter()
        .position(|token| !is_java_keyword(token))
}

/// A `throws` token after the parameter list's closing `)`
fn throws(tokens: &Tokens) -> bool {
    tokens
        .find(")")
        .and_then(|close| tokens.find_from(close + 1, "throws"))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment_filter::{CommentFilter, CommentMarkers};
    use crate::params::{DisassemblyParams, SourceParams};

    const JAVAP: &str = r#"Compiled from "Foo.java"
public class local.Foo extends local.SuperFoo {
  public static final int answer;
  public static local.Bar mybar;
  public local.Foo(boolean) throws java.lang.Exception;
  public local.Foo();
  public java.util.List<java.lang.String> method1(boolean, java.util.List<java.lang.String>) throws java.lang.Exception;
  public static int method8();
  public <T> T identity(T);
  public java.lang.String method3(java.lang.String...);
  static {};
}
"#;

    const SOURCE: &str = r#"package local;

import java.util.List;
import java.util.concurrent.*;
import static java.util.Collections.emptyList;

/**
 * A class with a mix of members.
 */
public class Foo extends SuperFoo {
    public static final int answer = 42;
    public static Bar mybar = new Bar(); // initialized
    private int hidden;

    public Foo(boolean fail) throws Exception {
        if (fail) {
            throw new Exception("failed: {}");
        }
    }

    @Override
    public String toString() {
        return "Foo";
    }

    public static class Inner {
        public void innerMethod() {
        }
    }
}
"#;

    fn parse_javap(input: &str) -> ClassSignature {
        let filtered = CommentFilter::new(
            CommentMarkers::javap_line("Compiled from"),
            input.as_bytes(),
        );
        SignatureParser::new(DisassemblyParams).parse(filtered).unwrap()
    }

    fn parse_source(input: &str) -> ClassSignature {
        let block = CommentFilter::new(CommentMarkers::java_block(), input.as_bytes());
        let line = CommentFilter::new(CommentMarkers::java_line(), block);
        SignatureParser::new(SourceParams).parse(line).unwrap()
    }

    #[test]
    fn test_javap_class() {
        let sig = parse_javap(JAVAP);

        assert_eq!(sig.class_name, "local.Foo");
        assert_eq!(sig.extends_name, "local.SuperFoo");

        assert_eq!(sig.constructors.len(), 2);
        assert!(sig.constructors[0].throws);
        assert_eq!(sig.constructors[0].params.types(), vec!["boolean"]);
        assert!(!sig.constructors[1].throws);
        assert_eq!(
            sig.constructors[0].line,
            "public local.Foo(boolean) throws java.lang.Exception"
        );

        let names: Vec<_> = sig.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["method1", "method8", "method3"]);

        let method1 = &sig.methods[0];
        assert_eq!(method1.return_type, "java.util.List<java.lang.String>");
        assert_eq!(method1.params.names(), vec!["a", "b"]);
        assert!(method1.throws);
        assert!(!method1.is_static);
        assert!(sig.methods[1].is_static);
        assert_eq!(sig.methods[2].params.types(), vec!["java.lang.String..."]);

        assert_eq!(sig.fields.len(), 2);
        assert_eq!(sig.fields[0].name, "answer");
        assert_eq!(sig.fields[0].java_type, "int");
        assert_eq!(sig.fields[1].java_type, "local.Bar");
    }

    #[test]
    fn test_source_class() {
        let sig = parse_source(SOURCE);

        assert_eq!(sig.package_name, "local");
        assert_eq!(sig.imports, vec!["java.util.List", "java.util.concurrent.*"]);
        assert_eq!(sig.class_name, "Foo");
        assert_eq!(sig.extends_name, "SuperFoo");

        assert_eq!(sig.constructors.len(), 1);
        assert_eq!(sig.constructors[0].params.names(), vec!["fail"]);
        assert!(sig.constructors[0].throws);

        // Inner class members are nested deeper and never reach the outer class
        let names: Vec<_> = sig.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["toString"]);

        let fields: Vec<_> = sig.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["answer", "mybar"]);
    }

    #[test]
    fn test_throws_only_after_params() {
        let mut sig = ClassSignature {
            class_name: "Foo".to_string(),
            ..Default::default()
        };
        let parser = SignatureParser::new(SourceParams);

        let tokens = Tokens::parse("public void run(throws x)");
        parser.parse_member(&mut sig, &tokens, "run");
        let tokens = Tokens::parse("public void stop() throws java.io.IOException");
        parser.parse_member(&mut sig, &tokens, "stop");

        assert!(!sig.methods[0].throws);
        assert!(sig.methods[1].throws);
    }

    #[test]
    fn test_generic_class_skipped() {
        let sig = parse_javap(
            "public class local.Box<T> extends java.lang.Object {\n  public T get();\n}\n",
        );
        assert_eq!(sig.class_name, "");
        assert!(sig.methods.is_empty());
    }

    #[test]
    fn test_interface() {
        let sig = parse_javap(
            "public interface local.Greeter {\n  public abstract java.lang.String greet(java.lang.String);\n}\n",
        );
        assert_eq!(sig.class_name, "local.Greeter");
        assert_eq!(sig.methods.len(), 1);
        assert_eq!(sig.methods[0].name, "greet");
        assert_eq!(sig.methods[0].return_type, "java.lang.String");
    }
}
