//! Error types for jagen

use std::io;

/// Result type alias for jagen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating bindings
///
/// Only the boundary can fail: opening or reading an input. Statements that
/// don't look like anything the parser understands are skipped, not reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error opening or reading one of the inputs
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Neither a javap dump nor a Java source was supplied
    #[error("No input: a javap dump or a Java source file is required")]
    MissingInput,

    /// A `JAVA=GO` type mapping that could not be split
    #[error("Invalid type mapping '{0}', expected JAVA_TYPE=GO_TYPE")]
    InvalidTypeMapping(String),
}
