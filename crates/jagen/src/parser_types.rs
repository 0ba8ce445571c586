//! Shared intermediate representation of a parsed Java class
//!
//! These types are produced by [`SignatureParser`](crate::parser::SignatureParser)
//! for both javap dumps and Java sources, and read by the filters and the
//! generator through the [`SignatureView`] trait.

use crate::java_type::simple_type_name;

/// A single constructor or method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, either from source or a synthesized placeholder
    pub name: String,
    /// Raw Java type expression (e.g. `java.util.List<java.lang.String>`,
    /// `int[]`, `java.lang.String...`)
    pub java_type: String,
}

impl Param {
    pub fn new(name: impl Into<String>, java_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            java_type: java_type.into(),
        }
    }
}

/// Ordered parameter list; the order is the call-site order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(pub Vec<Param>);

impl Params {
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn types(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.java_type.as_str()).collect()
    }

    /// Parameter types with package qualifiers stripped
    pub fn type_class_names(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|p| simple_type_name(&p.java_type))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.0.iter()
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A public constructor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSigConstructor {
    pub params: Params,
    /// Whether a `throws` clause follows the parameter list
    pub throws: bool,
    /// The declaring statement, whitespace-normalized
    pub line: String,
}

/// A public method (instance or static)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSigMethod {
    pub name: String,
    pub params: Params,
    /// Raw Java return type (`void` for none)
    pub return_type: String,
    pub throws: bool,
    pub is_static: bool,
    pub line: String,
}

/// A public static field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSigField {
    pub name: String,
    pub java_type: String,
    pub is_static: bool,
}

/// Everything jagen knows about one Java class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSignature {
    pub package_name: String,
    /// Names from `import` statements, as written (source input only)
    pub imports: Vec<String>,
    /// Class name as declared: fully qualified in javap dumps, simple in sources
    pub class_name: String,
    pub extends_name: String,
    pub constructors: Vec<ClassSigConstructor>,
    pub methods: Vec<ClassSigMethod>,
    pub fields: Vec<ClassSigField>,
}

/// Read-only access to a class signature
///
/// Filters wrap a view and hand out a narrowed one, so the generator never
/// needs to know whether it is looking at the raw signature or a filtered one.
pub trait SignatureView {
    fn package_name(&self) -> &str;
    fn class_name(&self) -> &str;
    fn extends_name(&self) -> &str;
    fn constructors(&self) -> Vec<&ClassSigConstructor>;
    fn methods(&self) -> Vec<&ClassSigMethod>;
    fn fields(&self) -> Vec<&ClassSigField>;

    /// Class name qualified with the package when the declaration itself
    /// was unqualified (source input)
    fn qualified_class_name(&self) -> String {
        let class_name = self.class_name();
        if class_name.contains('.') || self.package_name().is_empty() {
            class_name.to_string()
        } else {
            format!("{}.{}", self.package_name(), class_name)
        }
    }
}

impl SignatureView for ClassSignature {
    fn package_name(&self) -> &str {
        &self.package_name
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn extends_name(&self) -> &str {
        &self.extends_name
    }

    fn constructors(&self) -> Vec<&ClassSigConstructor> {
        self.constructors.iter().collect()
    }

    fn methods(&self) -> Vec<&ClassSigMethod> {
        self.methods.iter().collect()
    }

    fn fields(&self) -> Vec<&ClassSigField> {
        self.fields.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_class_names() {
        let params = Params(vec![
            Param::new("a", "java.lang.String"),
            Param::new("b", "int"),
            Param::new("c", "java.util.Map<java.lang.String, local.Bar>"),
        ]);
        assert_eq!(
            params.type_class_names(),
            vec!["String", "int", "Map<String,Bar>"]
        );
        assert_eq!(params.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_qualified_class_name() {
        let mut sig = ClassSignature {
            package_name: "local".to_string(),
            class_name: "Foo".to_string(),
            ..Default::default()
        };
        assert_eq!(sig.qualified_class_name(), "local.Foo");

        sig.class_name = "local.Foo".to_string();
        assert_eq!(sig.qualified_class_name(), "local.Foo");

        sig.package_name.clear();
        sig.class_name = "Foo".to_string();
        assert_eq!(sig.qualified_class_name(), "Foo");
    }
}
