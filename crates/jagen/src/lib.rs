//! jagen generates Go bindings for Java classes.
//!
//! Input is the `javap -s` dump of a compiled class, the class's Java source,
//! or both. With both, the javap dump supplies the signature and the source
//! supplies real parameter names. The output is Go source that calls into the
//! class through the `github.com/timob/javabind` runtime.
//!
//! ```no_run
//! use jagen::Builder;
//!
//! let bindings = Builder::new()
//!     .disassembly_file("Foo.javap")
//!     .source_file("Foo.java")
//!     .package_name("foo")
//!     .generate()?;
//! print!("{}", bindings);
//! # Ok::<(), jagen::Error>(())
//! ```

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub mod comment_filter;
mod error;
pub mod filter;
pub mod generator;
pub mod java_type;
pub mod params;
pub mod parser;
pub mod parser_types;
pub mod reconcile;
pub mod resolve;
pub mod statements;
pub mod tokens;
pub mod translator;

pub use error::{Error, Result};
pub use parser_types::{ClassSignature, SignatureView};

use comment_filter::{CommentFilter, CommentMarkers};
use filter::{AbstractClassList, DenylistFilter};
use generator::{GoGenerator, DEFAULT_PACKAGE};
use params::{DisassemblyParams, SourceParams};
use parser::SignatureParser;
use translator::{CallableCollector, GoTranslator, ImportCollector, TranslationTables, TypeTranslator};

#[derive(Debug, Clone)]
enum Input {
    File(PathBuf),
    Text(String),
}

impl Input {
    fn open(&self) -> Result<Box<dyn Read + Send + '_>> {
        match self {
            Input::File(path) => {
                log::debug!("reading {}", path.display());
                Ok(Box::new(fs::File::open(path)?))
            }
            Input::Text(text) => Ok(Box::new(text.as_bytes())),
        }
    }
}

/// Parse a `javap -s` dump
///
/// `Compiled from`, `Signature:` and `descriptor:` lines are dropped before
/// parsing; descriptors contain `;` and would split statements.
pub fn parse_disassembly<R: Read + Send>(input: R) -> Result<ClassSignature> {
    let input = CommentFilter::new(CommentMarkers::javap_line("Compiled from"), input);
    let input = CommentFilter::new(CommentMarkers::javap_line("Signature:"), input);
    let input = CommentFilter::new(CommentMarkers::javap_line("descriptor:"), input);
    SignatureParser::new(DisassemblyParams).parse(input)
}

/// Parse Java source
///
/// Type names are qualified through the source's imports, so the signature
/// reads like one parsed from javap.
pub fn parse_source<R: Read + Send>(input: R) -> Result<ClassSignature> {
    let block = CommentFilter::new(CommentMarkers::java_block(), input);
    let line = CommentFilter::new(CommentMarkers::java_line(), block);
    let mut signature = SignatureParser::new(SourceParams).parse(line)?;
    resolve::qualify_types(&mut signature);
    Ok(signature)
}

/// Split a `JAVA=GO` type mapping argument
pub fn parse_type_mapping(arg: &str) -> Result<(String, String)> {
    let invalid = || Error::InvalidTypeMapping(arg.to_string());

    let (java, go) = arg.split_once('=').ok_or_else(invalid)?;
    let (java, go) = (java.trim(), go.trim());
    if java.is_empty() || go.is_empty() {
        return Err(invalid());
    }
    Ok((java.to_string(), go.to_string()))
}

/// Builder for generating Go bindings for one Java class
#[derive(Debug, Clone, Default)]
pub struct Builder {
    disassembly: Option<Input>,
    source: Option<Input>,
    package_name: Option<String>,
    trim_prefix: String,
    denylist: String,
    abstract_class_files: Vec<PathBuf>,
    abstract_classes: Vec<String>,
    type_mappings: Vec<(String, String)>,
    go_imports: Vec<(String, String)>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `javap -s` dump from a file
    pub fn disassembly_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.disassembly = Some(Input::File(path.into()));
        self
    }

    /// Use an in-memory `javap -s` dump
    pub fn disassembly_text(mut self, text: impl Into<String>) -> Self {
        self.disassembly = Some(Input::Text(text.into()));
        self
    }

    /// Read the Java source from a file
    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(Input::File(path.into()));
        self
    }

    pub fn source_text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(Input::Text(text.into()));
        self
    }

    /// Go package name of the generated file (default `gojvm_gen_package`)
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Java package prefix dropped from generated type names
    pub fn trim_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.trim_prefix = prefix.into();
        self
    }

    /// Space separated type names; members mentioning any of them are dropped
    pub fn denylist(mut self, denylist: impl Into<String>) -> Self {
        self.denylist = denylist.into();
        self
    }

    /// File listing abstract classes and interfaces, one per line
    pub fn abstract_class_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.abstract_class_files.push(path.into());
        self
    }

    pub fn abstract_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abstract_classes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Convert the Java type head `java_type` to the Go type `go_type`
    /// instead of wrapping it. `%s` in `go_type` stands for a type argument.
    pub fn type_mapping(mut self, java_type: impl Into<String>, go_type: impl Into<String>) -> Self {
        self.type_mappings.push((java_type.into(), go_type.into()));
        self
    }

    /// Import `path` whenever a converted Go type uses the package
    /// qualifier `qualifier`
    pub fn go_import(mut self, qualifier: impl Into<String>, path: impl Into<String>) -> Self {
        self.go_imports.push((qualifier.into(), path.into()));
        self
    }

    /// Parse the inputs into the signature that bindings are generated from
    pub fn parse(&self) -> Result<ClassSignature> {
        let source = match &self.source {
            Some(input) => Some(parse_source(input.open()?)?),
            None => None,
        };

        match (&self.disassembly, source) {
            (Some(input), Some(source)) => {
                let mut signature = parse_disassembly(input.open()?)?;
                reconcile::reconcile(&mut signature, &source);
                Ok(signature)
            }
            (Some(input), None) => parse_disassembly(input.open()?),
            (None, Some(source)) => Ok(source),
            (None, None) => Err(Error::MissingInput),
        }
    }

    pub fn generate(&self) -> Result<Bindings> {
        let signature = self.parse()?;

        let mut abstract_classes = AbstractClassList::from_names(&self.abstract_classes);
        for path in &self.abstract_class_files {
            abstract_classes.extend(AbstractClassList::from_file(path)?);
        }

        let tables = self
            .type_mappings
            .iter()
            .fold(TranslationTables::default(), |tables, (java, go)| {
                tables.with_conversion(java, go)
            });
        let tables = self
            .go_imports
            .iter()
            .fold(tables, |tables, (qualifier, path)| tables.with_import(qualifier, path));
        let imports = tables.imports.clone();
        let translator = ImportCollector::new(
            CallableCollector::new(GoTranslator::new(tables, self.trim_prefix.as_str())),
            imports,
        );

        let view = DenylistFilter::new(&signature, &self.denylist);
        let package_name = self.package_name.as_deref().unwrap_or(DEFAULT_PACKAGE);
        let code = GoGenerator::new(&translator, &abstract_classes, package_name).generate(&view);

        let callables = translator.callables();
        log::info!(
            "generated bindings for {} ({} callable dependencies)",
            signature.qualified_class_name(),
            callables.len()
        );

        Ok(Bindings {
            code,
            callables,
            signature,
        })
    }
}

/// Generated Go source plus what was learned while generating it
#[derive(Debug, Clone)]
pub struct Bindings {
    code: String,
    callables: Vec<String>,
    signature: ClassSignature,
}

impl Bindings {
    /// The Go source; empty when no public class was found
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Distinct Java classes the bindings refer to through wrappers
    pub fn callables(&self) -> &[String] {
        &self.callables
    }

    /// Callable class names, one per line
    pub fn dependencies(&self) -> String {
        self.callables.iter().map(|c| format!("{}\n", c)).collect()
    }

    /// The parsed (and reconciled) signature, before filtering
    pub fn signature(&self) -> &ClassSignature {
        &self.signature
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.code)?;
        Ok(())
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
