//! Custom error types for the msh-reader crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Every variant is fatal to the parse that produced it; there is no
/// partial mesh to recover.
#[derive(Debug, Error)]
pub enum MshError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mesh file passed to [`parse`](crate::parse) does not exist.
    #[error("Mesh file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The version field of `$MeshFormat` is not a decimal number.
    #[error("Malformed MSH version string: '{0}'")]
    MalformedVersion(String),

    /// The version parsed fine but is not one of the known MSH generations.
    #[error("Unrecognized MSH format version: {major}.{minor}")]
    UnrecognizedVersion { major: u32, minor: u32 },

    /// The version is recognized but parsing it is disabled.
    #[error("MSH format version {0} is recognized but not supported")]
    UnsupportedVersion(String),

    /// The header declares a binary file (`file-type != 0`).
    #[error("Unsupported file type {0}: only ASCII (0) MSH files are supported")]
    UnsupportedEncoding(i64),

    /// A section body line does not have the expected shape.
    #[error("Malformed {section} section at line {line}: {reason}")]
    MalformedSection {
        section: &'static str,
        line: usize,
        reason: String,
    },

    /// The input ended while a section still expected data.
    #[error("Unexpected end of input in {section} section: expected {expected}")]
    UnexpectedEndOfInput {
        section: &'static str,
        expected: String,
    },

    /// An element references a node tag that no node entity defines.
    #[error("Element {element} references unknown node {node}")]
    UnknownNode { element: u64, node: u64 },
}

/// A convenience `Result` type alias using the crate's `MshError` type.
pub type Result<T> = std::result::Result<T, MshError>;
