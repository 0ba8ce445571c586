//! Java to Go type translation
//!
//! [`GoTranslator`] maps a Java type expression onto a Go type. Collectors
//! wrap a translator and record what they see while the generator walks a
//! class. Type arguments are translated through the outermost wrapper (the
//! `outer` argument of [`TypeTranslator::translate_in`]) so a collector also
//! sees the arguments of every container it is handed.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use crate::java_type::{simple_type_name, type_components, wildcard_bound, ARRAY, VARARGS};

/// Primitive and `void` translations, matched exactly
const PRIMITIVES: &[(&str, &str)] = &[
    ("void", ""),
    ("boolean", "bool"),
    ("byte", "byte"),
    ("char", "uint16"),
    ("short", "int16"),
    ("int", "int"),
    ("long", "int64"),
    ("float", "float32"),
    ("double", "float64"),
    ("boolean[]", "[]bool"),
    ("byte[]", "[]byte"),
    ("char[]", "[]uint16"),
    ("short[]", "[]int16"),
    ("int[]", "[]int"),
    ("long[]", "[]int64"),
    ("float[]", "[]float32"),
    ("double[]", "[]float64"),
];

/// Value conversions keyed by type head. `%s` stands for a translated type
/// argument.
const OBJECT_CONVERSIONS: &[(&str, &str)] = &[
    ("java.lang.Boolean", "bool"),
    ("java.lang.Byte", "byte"),
    ("java.lang.Short", "int16"),
    ("java.lang.Character", "uint16"),
    ("java.lang.Long", "int64"),
    ("java.lang.Integer", "int"),
    ("java.lang.Float", "float32"),
    ("java.lang.Double", "float64"),
    ("java.lang.String", "string"),
    ("java.net.InetAddress", "string"),
    ("java.util.Date", "time.Time"),
    (VARARGS, "...%s"),
    (ARRAY, "[]%s"),
    ("java.util.List", "[]%s"),
    ("java.util.Collection", "[]%s"),
    ("java.util.Set", "[]%s"),
    ("java.util.Iterator", "[]%s"),
    ("java.util.Map", "map[%s]%s"),
    ("java.util.Map$Entry", "struct{Key %s; Value %s}"),
];

/// Go package qualifier to import path
const IMPORTS: &[(&str, &str)] = &[("time", "time")];

/// Type argument substituted for a missing one (raw containers) or an
/// unbounded wildcard
const ANY: &str = "interface{}";

/// Translation tables handed to a [`GoTranslator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTables {
    pub primitives: HashMap<String, String>,
    pub conversions: HashMap<String, String>,
    /// Go package qualifier to import path
    pub imports: HashMap<String, String>,
}

impl Default for TranslationTables {
    fn default() -> Self {
        Self {
            primitives: table_map(PRIMITIVES),
            conversions: table_map(OBJECT_CONVERSIONS),
            imports: table_map(IMPORTS),
        }
    }
}

fn table_map(table: &[(&str, &str)]) -> HashMap<String, String> {
    table
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl TranslationTables {
    /// Register an extra value conversion for a type head
    pub fn with_conversion(mut self, java_head: &str, go_template: &str) -> Self {
        self.conversions
            .insert(java_head.to_string(), go_template.to_string());
        self
    }

    /// Register the import path for a Go package qualifier used by a
    /// conversion, e.g. `decimal` for `decimal.Decimal`
    pub fn with_import(mut self, qualifier: &str, path: &str) -> Self {
        self.imports.insert(qualifier.to_string(), path.to_string());
        self
    }
}

/// Java type to Go type mapping, decorated by collectors
pub trait TypeTranslator {
    /// Translate `java_type`, translating its type arguments through `outer`
    fn translate_in(&self, outer: &dyn TypeTranslator, java_type: &str) -> String;

    /// `java_type` is an exact match in the primitive table
    fn is_primitive(&self, java_type: &str) -> bool;

    /// `head` has no value conversion and maps to a generated wrapper
    fn is_callable(&self, head: &str) -> bool;

    /// Name of the generated wrapper struct for a Java class name
    fn go_type_name(&self, java_name: &str) -> String;

    /// Runtime converter constructor call for `java_type`, e.g.
    /// `javabind.NewGoToJavaList(javabind.NewGoToJavaString())`
    fn converter_for(&self, prefix: &str, java_type: &str) -> String;

    /// Go import paths needed by the types translated so far
    fn imports(&self) -> Vec<String> {
        Vec::new()
    }

    /// Distinct callable class names translated so far
    fn callables(&self) -> Vec<String> {
        Vec::new()
    }
}

impl dyn TypeTranslator + '_ {
    /// Translate through the whole decorator stack
    pub fn translate(&self, java_type: &str) -> String {
        self.translate_in(self, java_type)
    }
}

/// Table driven translator
#[derive(Debug, Clone, Default)]
pub struct GoTranslator {
    tables: TranslationTables,
    /// Package prefix stripped from wrapper names
    trim: String,
}

impl GoTranslator {
    pub fn new(tables: TranslationTables, trim: impl Into<String>) -> Self {
        Self {
            tables,
            trim: trim.into(),
        }
    }
}

impl TypeTranslator for GoTranslator {
    fn translate_in(&self, outer: &dyn TypeTranslator, java_type: &str) -> String {
        if let Some(go) = self.tables.primitives.get(java_type) {
            log::trace!("translated {} to '{}'", java_type, go);
            return go.clone();
        }

        let components = type_components(java_type);
        let head = components.first().map_or("", String::as_str);

        let go = match self.tables.conversions.get(head) {
            Some(template) => {
                let arguments: Vec<String> = components
                    .iter()
                    .skip(1)
                    .map(|argument| match wildcard_bound(argument) {
                        Some("") => ANY.to_string(),
                        Some(bound) => outer.translate_in(outer, bound),
                        None => outer.translate_in(outer, argument),
                    })
                    .collect();
                format_template(template, &arguments)
            }
            None => format!("*{}", self.go_type_name(head)),
        };

        log::trace!("translated {} to '{}'", java_type, go);
        go
    }

    fn is_primitive(&self, java_type: &str) -> bool {
        self.tables.primitives.contains_key(java_type)
    }

    fn is_callable(&self, head: &str) -> bool {
        !self.tables.conversions.contains_key(head)
    }

    fn go_type_name(&self, java_name: &str) -> String {
        let name = if self.trim.is_empty() {
            java_name
        } else {
            java_name
                .strip_prefix(&self.trim)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(java_name)
        };

        name.split(['.', '$']).map(capitalize).collect()
    }

    fn converter_for(&self, prefix: &str, java_type: &str) -> String {
        let components = type_components(java_type);
        let head = components.first().map_or("", String::as_str);

        let name = if head == VARARGS || head == ARRAY {
            "ObjectArray".to_string()
        } else if self.is_callable(head) {
            return format!("{}Callable()", prefix);
        } else {
            simple_type_name(head).replace('$', "_")
        };

        let arguments: Vec<String> = components
            .iter()
            .skip(1)
            .map(|argument| {
                self.converter_for(prefix, wildcard_bound(argument).unwrap_or(argument))
            })
            .collect();

        format!("{}{}({})", prefix, name, arguments.join(", "))
    }
}

/// Substitute `arguments` for the `%s` placeholders of `template` in order
///
/// Placeholders without an argument become `interface{}`.
pub fn format_template(template: &str, arguments: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut arguments = arguments.iter();
    let mut pieces = template.split("%s");

    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        out.push_str(arguments.next().map_or(ANY, String::as_str));
        out.push_str(piece);
    }

    out
}

/// Upper-case the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Records every callable class a translation touches
pub struct CallableCollector<T> {
    inner: T,
    callables: RefCell<BTreeSet<String>>,
}

impl<T: TypeTranslator> CallableCollector<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            callables: RefCell::new(BTreeSet::new()),
        }
    }
}

impl<T: TypeTranslator> TypeTranslator for CallableCollector<T> {
    fn translate_in(&self, outer: &dyn TypeTranslator, java_type: &str) -> String {
        let components = type_components(java_type);
        if let Some(head) = components.first() {
            if !self.is_primitive(head) && self.is_callable(head) {
                self.callables.borrow_mut().insert(head.clone());
            }
        }
        self.inner.translate_in(outer, java_type)
    }

    fn is_primitive(&self, java_type: &str) -> bool {
        self.inner.is_primitive(java_type)
    }

    fn is_callable(&self, head: &str) -> bool {
        self.inner.is_callable(head)
    }

    fn go_type_name(&self, java_name: &str) -> String {
        self.inner.go_type_name(java_name)
    }

    fn converter_for(&self, prefix: &str, java_type: &str) -> String {
        self.inner.converter_for(prefix, java_type)
    }

    fn imports(&self) -> Vec<String> {
        self.inner.imports()
    }

    fn callables(&self) -> Vec<String> {
        let mut callables = self.callables.borrow().clone();
        callables.extend(self.inner.callables());
        callables.into_iter().collect()
    }
}

/// Records converted Go types and resolves the imports they need
pub struct ImportCollector<T> {
    inner: T,
    imports: HashMap<String, String>,
    converted: RefCell<BTreeSet<String>>,
}

impl<T: TypeTranslator> ImportCollector<T> {
    /// `imports` maps Go package qualifiers to import paths
    pub fn new(inner: T, imports: HashMap<String, String>) -> Self {
        Self {
            inner,
            imports,
            converted: RefCell::new(BTreeSet::new()),
        }
    }
}

impl<T: TypeTranslator> TypeTranslator for ImportCollector<T> {
    fn translate_in(&self, outer: &dyn TypeTranslator, java_type: &str) -> String {
        let go = self.inner.translate_in(outer, java_type);

        let components = type_components(java_type);
        if let Some(head) = components.first() {
            if !self.is_primitive(head) && !self.is_callable(head) {
                self.converted.borrow_mut().insert(go.clone());
            }
        }

        go
    }

    fn is_primitive(&self, java_type: &str) -> bool {
        self.inner.is_primitive(java_type)
    }

    fn is_callable(&self, head: &str) -> bool {
        self.inner.is_callable(head)
    }

    fn go_type_name(&self, java_name: &str) -> String {
        self.inner.go_type_name(java_name)
    }

    fn converter_for(&self, prefix: &str, java_type: &str) -> String {
        self.inner.converter_for(prefix, java_type)
    }

    fn imports(&self) -> Vec<String> {
        let mut imports: BTreeSet<String> = self.inner.imports().into_iter().collect();
        for go in self.converted.borrow().iter() {
            for (qualifier, path) in &self.imports {
                if go.strip_prefix(qualifier.as_str()).is_some_and(|rest| rest.starts_with('.')) {
                    imports.insert(path.clone());
                }
            }
        }
        imports.into_iter().collect()
    }

    fn callables(&self) -> Vec<String> {
        self.inner.callables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> GoTranslator {
        GoTranslator::new(TranslationTables::default(), "")
    }

    fn translate(t: &dyn TypeTranslator, java_type: &str) -> String {
        t.translate(java_type)
    }

    #[test]
    fn test_primitives() {
        let t = translator();
        assert_eq!(translate(&t, "int"), "int");
        assert_eq!(translate(&t, "void"), "");
        assert_eq!(translate(&t, "long[]"), "[]int64");
        assert!(t.is_primitive("int"));
        assert!(t.is_primitive("void"));
        assert!(!t.is_primitive("java.lang.Integer"));
    }

    #[test]
    fn test_containers() {
        let t = translator();
        assert_eq!(translate(&t, "java.lang.String"), "string");
        assert_eq!(translate(&t, "java.lang.String[]"), "[]string");
        assert_eq!(translate(&t, "java.lang.String..."), "...string");
        assert_eq!(
            translate(
                &t,
                "java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>"
            ),
            "map[string][]int"
        );
        assert_eq!(
            translate(&t, "java.util.Map$Entry<java.lang.String, local.Bar>"),
            "struct{Key string; Value *LocalBar}"
        );
        assert_eq!(translate(&t, "java.util.Map"), "map[interface{}]interface{}");
    }

    #[test]
    fn test_callable_names() {
        let t = translator();
        assert_eq!(translate(&t, "com.example.Widget"), "*ComExampleWidget");
        assert_eq!(translate(&t, "local.Outer$Inner"), "*LocalOuterInner");
        assert!(t.is_callable("com.example.Widget"));
        assert!(!t.is_callable("java.util.List"));

        let trimmed = GoTranslator::new(TranslationTables::default(), "com.example");
        assert_eq!(translate(&trimmed, "com.example.Widget"), "*Widget");
        assert_eq!(translate(&trimmed, "com.examples.Widget"), "*ComExamplesWidget");
        assert!(trimmed.is_callable("com.example.Widget"));
    }

    #[test]
    fn test_converters() {
        let t = translator();
        let prefix = "javabind.NewGoToJava";
        assert_eq!(
            t.converter_for(prefix, "java.lang.String"),
            "javabind.NewGoToJavaString()"
        );
        assert_eq!(
            t.converter_for(prefix, "java.util.List<java.lang.String>"),
            "javabind.NewGoToJavaList(javabind.NewGoToJavaString())"
        );
        assert_eq!(
            t.converter_for(prefix, "java.lang.String..."),
            "javabind.NewGoToJavaObjectArray(javabind.NewGoToJavaString())"
        );
        assert_eq!(
            t.converter_for(prefix, "java.util.Map$Entry<java.lang.String, local.Bar>"),
            "javabind.NewGoToJavaMap_Entry(javabind.NewGoToJavaString(), javabind.NewGoToJavaCallable())"
        );
        assert_eq!(t.converter_for(prefix, "local.Bar"), "javabind.NewGoToJavaCallable()");
    }

    #[test]
    fn test_extra_conversion() {
        let tables = TranslationTables::default().with_conversion("java.math.BigDecimal", "float64");
        let t = GoTranslator::new(tables, "");
        assert_eq!(translate(&t, "java.math.BigDecimal"), "float64");
        assert!(!t.is_callable("java.math.BigDecimal"));
    }

    #[test]
    fn test_format_template() {
        let args = ["string".to_string(), "int".to_string()];
        assert_eq!(format_template("map[%s]%s", &args), "map[string]int");
        assert_eq!(format_template("[]%s", &args[..0]), "[]interface{}");
        assert_eq!(format_template("string", &args), "string");
    }

    #[test]
    fn test_callable_collector_sees_nested_arguments() {
        let t = CallableCollector::new(translator());
        let t: &dyn TypeTranslator = &t;
        t.translate("java.util.Map<java.lang.String, local.Bar>");
        t.translate("local.Foo");
        t.translate("local.Bar");
        t.translate("int");
        assert_eq!(t.callables(), vec!["local.Bar", "local.Foo"]);
    }

    #[test]
    fn test_import_collector() {
        let t = ImportCollector::new(
            CallableCollector::new(translator()),
            TranslationTables::default().imports,
        );
        let t: &dyn TypeTranslator = &t;
        assert!(t.imports().is_empty());

        t.translate("java.util.List<java.util.Date>");
        t.translate("local.Bar");
        assert_eq!(t.imports(), vec!["time"]);
        // The inner collector is still reached through the stack
        assert_eq!(t.callables(), vec!["local.Bar"]);
    }

    #[test]
    fn test_extra_import() {
        let tables = TranslationTables::default()
            .with_conversion("java.math.BigDecimal", "decimal.Decimal")
            .with_import("decimal", "github.com/shopspring/decimal");
        let imports = tables.imports.clone();
        let t = ImportCollector::new(GoTranslator::new(tables, ""), imports);
        let t: &dyn TypeTranslator = &t;

        assert_eq!(t.translate("java.util.List<java.math.BigDecimal>"), "[]decimal.Decimal");
        assert_eq!(t.imports(), vec!["github.com/shopspring/decimal"]);
    }

    #[test]
    fn test_wildcard_arguments() {
        let t = CallableCollector::new(translator());
        let t: &dyn TypeTranslator = &t;

        assert_eq!(t.translate("java.util.List<? extends local.Bar>"), "[]*LocalBar");
        assert_eq!(t.translate("java.util.List<? super java.lang.Integer>"), "[]int");
        assert_eq!(t.translate("java.util.Map<?, java.lang.String>"), "map[interface{}]string");
        assert_eq!(t.callables(), vec!["local.Bar"]);

        assert_eq!(
            translator().converter_for("javabind.NewGoToJava", "java.util.List<? extends java.lang.String>"),
            "javabind.NewGoToJavaList(javabind.NewGoToJavaString())"
        );
    }
}
