/// Error types for OPC package operations
use std::fmt;

use thiserror::Error;

/// A single save-time invariant violation.
///
/// Validation runs over the whole package before any bytes are produced,
/// so one failed save can carry several of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveProblem {
    /// An internal relationship whose target part does not exist.
    DanglingRelationship {
        /// Partname of the owning part, or "/" for the package root
        source: String,
        /// Relationship ID (e.g., "rId3")
        r_id: String,
        /// The resolved target partname that is missing
        target: String,
    },

    /// An internal relationship whose target reference cannot be resolved
    /// to a partname at all (e.g., it climbs out of the package root).
    UnresolvableTarget {
        source: String,
        r_id: String,
        target_ref: String,
    },

    /// A part for which neither an override nor an extension default
    /// yields a content type.
    MissingContentType {
        /// Partname of the part without a resolvable content type
        partname: String,
    },
}

impl fmt::Display for SaveProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveProblem::DanglingRelationship {
                source,
                r_id,
                target,
            } => write!(
                f,
                "relationship {} of {} targets missing part {}",
                r_id, source, target
            ),
            SaveProblem::UnresolvableTarget {
                source,
                r_id,
                target_ref,
            } => write!(
                f,
                "relationship {} of {} has unresolvable target '{}'",
                r_id, source, target_ref
            ),
            SaveProblem::MissingContentType { partname } => {
                write!(f, "part {} has no resolvable content type", partname)
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum OpcError {
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Part already exists: {0}")]
    PartAlreadyExists(String),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    #[error("Content type not found for partname: {0}")]
    ContentTypeNotFound(String),

    #[error("Namespace not registered: {0}")]
    NamespaceNotFound(String),

    #[error("External relationship has no partname: {0}")]
    ExternalTarget(String),

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    #[error("Package failed validation: {}", .0.iter().map(|p| p.to_string()).collect::<Vec<_>>().join("; "))]
    InvalidPackage(Vec<SaveProblem>),

    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Quick-XML error: {0}")]
    QuickXmlError(#[from] quick_xml::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("Attribute error: {0}")]
    AttrError(String),
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::AttrError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
