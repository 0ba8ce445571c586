//! Signature filters
//!
//! [`DenylistFilter`] narrows a [`SignatureView`] to members that reference
//! none of a set of denied types. [`AbstractClassList`] tells the generator
//! which classes cannot be wrapped concretely.

use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::java_type::{simple_type_name, type_heads};
use crate::parser_types::{ClassSigConstructor, ClassSigField, ClassSigMethod, Params, SignatureView};

/// A [`SignatureView`] dropping every member that mentions a denied type
///
/// Types are split recursively, so `java.util.List<local.Secret>` is denied
/// by `local.Secret`. Entries match either the fully qualified or the
/// simple class name.
pub struct DenylistFilter<'a, V: ?Sized> {
    inner: &'a V,
    denied: HashSet<String>,
}

impl<'a, V: SignatureView + ?Sized> DenylistFilter<'a, V> {
    /// `denylist` is a space separated list of type names
    pub fn new(inner: &'a V, denylist: &str) -> Self {
        Self {
            inner,
            denied: denylist.split_whitespace().map(str::to_string).collect(),
        }
    }

    fn is_denied(&self, java_type: &str) -> bool {
        type_heads(java_type).iter().any(|head| {
            self.denied.contains(head) || self.denied.contains(&simple_type_name(head))
        })
    }

    fn params_denied(&self, params: &Params) -> bool {
        params.iter().any(|p| self.is_denied(&p.java_type))
    }
}

impl<V: SignatureView + ?Sized> SignatureView for DenylistFilter<'_, V> {
    fn package_name(&self) -> &str {
        self.inner.package_name()
    }

    fn class_name(&self) -> &str {
        self.inner.class_name()
    }

    fn extends_name(&self) -> &str {
        let extends = self.inner.extends_name();
        if self.is_denied(extends) {
            log::debug!("dropping denied superclass {}", extends);
            return "";
        }
        extends
    }

    fn constructors(&self) -> Vec<&ClassSigConstructor> {
        self.inner
            .constructors()
            .into_iter()
            .filter(|c| {
                let denied = self.params_denied(&c.params);
                if denied {
                    log::debug!("dropping denied constructor: {}", c.line);
                }
                !denied
            })
            .collect()
    }

    fn methods(&self) -> Vec<&ClassSigMethod> {
        self.inner
            .methods()
            .into_iter()
            .filter(|m| {
                let denied = self.params_denied(&m.params) || self.is_denied(&m.return_type);
                if denied {
                    log::debug!("dropping denied method: {}", m.line);
                }
                !denied
            })
            .collect()
    }

    fn fields(&self) -> Vec<&ClassSigField> {
        self.inner
            .fields()
            .into_iter()
            .filter(|f| !self.is_denied(&f.java_type))
            .collect()
    }
}

/// Names of abstract classes and interfaces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbstractClassList {
    names: HashSet<String>,
}

impl AbstractClassList {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// One class name per line; blank lines are ignored
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut names = Vec::new();
        for line in reader.lines() {
            names.push(line?);
        }
        Ok(Self::from_names(names))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = HashSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if name.contains(char::is_whitespace) {
                log::warn!("abstract class name '{}' contains whitespace", name);
            }
            list.insert(name.to_string());
        }
        Self { names: list }
    }

    pub fn is_abstract(&self, class_name: &str) -> bool {
        self.names.contains(class_name)
    }

    pub fn extend(&mut self, other: AbstractClassList) {
        self.names.extend(other.names);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
