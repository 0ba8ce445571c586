//! Qualifying the type names of a source-derived signature
//!
//! Java sources spell types the way the imports allow (`String`,
//! `List<Bar>`), while translation tables and generated wrapper names work
//! on qualified names. [`TypeResolver`] rewrites every class name in a type
//! expression, looking it up in order among the single-type imports, the
//! implicitly imported `java.lang` classes and finally the declaring package.

use std::collections::HashMap;

use crate::java_type::VARARGS;
use crate::parser_types::{ClassSignature, Params};

/// Names that are never class names inside a type expression
const RESERVED: &[&str] = &[
    "void", "boolean", "byte", "char", "short", "int", "long", "float", "double", "extends",
    "super", "final",
];

/// Public `java.lang` types, visible without an import
const JAVA_LANG: &[&str] = &[
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "Comparable",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "Integer",
    "Iterable",
    "Long",
    "Math",
    "Number",
    "Object",
    "Record",
    "Runnable",
    "RuntimeException",
    "Short",
    "String",
    "StringBuffer",
    "StringBuilder",
    "System",
    "Thread",
    "Throwable",
    "Void",
];

/// Resolves simple class names against a compilation unit's imports
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    package_name: String,
    /// Simple name to qualified name, from single-type imports
    imports: HashMap<String, String>,
    on_demand: Vec<String>,
}

impl TypeResolver {
    pub fn new(package_name: &str, imports: &[String]) -> Self {
        let mut resolver = Self {
            package_name: package_name.to_string(),
            ..Default::default()
        };

        for import in imports {
            if let Some(package) = import.strip_suffix(".*") {
                resolver.on_demand.push(package.to_string());
                continue;
            }
            let simple = import.rsplit('.').next().unwrap_or(import);
            resolver.imports.insert(simple.to_string(), import.clone());
        }

        resolver
    }

    /// Rewrite every class name in `java_type` to its qualified form
    ///
    /// Names that already contain a `.` are left alone unless their first
    /// segment is an imported class, in which case they name a nested class
    /// (`Map.Entry` becomes `java.util.Map$Entry`).
    pub fn resolve(&self, java_type: &str) -> String {
        if let Some(element) = java_type.strip_suffix(VARARGS) {
            return format!("{}{}", self.resolve(element), VARARGS);
        }

        let mut out = String::with_capacity(java_type.len());
        let mut name = String::new();

        for c in java_type.chars() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                name.push(c);
            } else {
                out.push_str(&self.resolve_name(&std::mem::take(&mut name)));
                out.push(c);
            }
        }
        out.push_str(&self.resolve_name(&name));

        out
    }

    fn resolve_name(&self, name: &str) -> String {
        if name.is_empty() || RESERVED.contains(&name) {
            return name.to_string();
        }

        if let Some((outer, nested)) = name.split_once('.') {
            return match self.imports.get(outer) {
                Some(qualified) => format!("{}${}", qualified, nested.replace('.', "$")),
                None => name.to_string(),
            };
        }

        if let Some(qualified) = self.imports.get(name) {
            return qualified.clone();
        }
        if JAVA_LANG.contains(&name) {
            return format!("java.lang.{}", name);
        }
        if !self.on_demand.is_empty() {
            log::debug!(
                "'{}' may come from an on-demand import, assuming package '{}'",
                name,
                self.package_name
            );
        }
        if self.package_name.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.package_name, name)
        }
    }

    fn resolve_params(&self, params: &mut Params) {
        for param in &mut params.0 {
            param.java_type = self.resolve(&param.java_type);
        }
    }
}

/// Qualify every type mentioned by a source-derived signature
///
/// The class name itself stays as declared; the declaring package already
/// qualifies it.
pub fn qualify_types(sig: &mut ClassSignature) {
    let resolver = TypeResolver::new(&sig.package_name, &sig.imports);

    if !sig.extends_name.is_empty() {
        sig.extends_name = resolver.resolve(&sig.extends_name);
    }
    for constructor in &mut sig.constructors {
        resolver.resolve_params(&mut constructor.params);
    }
    for method in &mut sig.methods {
        resolver.resolve_params(&mut method.params);
        method.return_type = resolver.resolve(&method.return_type);
    }
    for field in &mut sig.fields {
        field.java_type = resolver.resolve(&field.java_type);
    }

    log::debug!("qualified source types of {}", sig.class_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_types::{ClassSigField, ClassSigMethod, Param};

    fn resolver() -> TypeResolver {
        TypeResolver::new(
            "local",
            &[
                "java.util.List".to_string(),
                "java.util.Map".to_string(),
                "other.Widget".to_string(),
            ],
        )
    }

    #[test]
    fn test_resolution_order() {
        let r = resolver();
        assert_eq!(r.resolve("Widget"), "other.Widget");
        assert_eq!(r.resolve("String"), "java.lang.String");
        assert_eq!(r.resolve("Bar"), "local.Bar");
        assert_eq!(r.resolve("int"), "int");
        assert_eq!(r.resolve("java.util.Date"), "java.util.Date");
    }

    #[test]
    fn test_type_expressions() {
        let r = resolver();
        assert_eq!(
            r.resolve("Map<String, List<Bar>>"),
            "java.util.Map<java.lang.String, java.util.List<local.Bar>>"
        );
        assert_eq!(r.resolve("String[]"), "java.lang.String[]");
        assert_eq!(r.resolve("String..."), "java.lang.String...");
        assert_eq!(r.resolve("int[][]"), "int[][]");
        assert_eq!(
            r.resolve("List<? extends Widget>"),
            "java.util.List<? extends other.Widget>"
        );
        assert_eq!(
            r.resolve("Map.Entry<String, Bar>"),
            "java.util.Map$Entry<java.lang.String, local.Bar>"
        );
    }

    #[test]
    fn test_default_package() {
        let r = TypeResolver::new("", &["java.util.*".to_string()]);
        assert_eq!(r.resolve("Bar"), "Bar");
        assert_eq!(r.resolve("Integer"), "java.lang.Integer");
    }

    #[test]
    fn test_qualify_types() {
        let mut sig = ClassSignature {
            package_name: "local".to_string(),
            imports: vec!["java.util.List".to_string()],
            class_name: "Foo".to_string(),
            extends_name: "SuperFoo".to_string(),
            methods: vec![ClassSigMethod {
                name: "items".to_string(),
                params: Params(vec![Param::new("xs", "List<String>")]),
                return_type: "List<Bar>".to_string(),
                line: "public List<Bar> items(List<String> xs)".to_string(),
                ..Default::default()
            }],
            fields: vec![ClassSigField {
                name: "DEFAULT".to_string(),
                java_type: "String".to_string(),
                is_static: true,
            }],
            ..Default::default()
        };

        qualify_types(&mut sig);

        assert_eq!(sig.class_name, "Foo");
        assert_eq!(sig.extends_name, "local.SuperFoo");
        assert_eq!(
            sig.methods[0].params.types(),
            vec!["java.util.List<java.lang.String>"]
        );
        assert_eq!(sig.methods[0].return_type, "java.util.List<local.Bar>");
        assert_eq!(sig.methods[0].line, "public List<Bar> items(List<String> xs)");
        assert_eq!(sig.fields[0].java_type, "java.lang.String");
    }
}
