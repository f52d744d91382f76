//! Pomelo - reading and writing the OPC package layer of SpreadsheetML documents
//!
//! An `.xlsx` workbook is an Open Packaging Conventions (OPC) container: a ZIP
//! archive holding a graph of interrelated XML parts — workbook, worksheets,
//! styles, shared strings, theme — tied together by content-type declarations
//! and typed relationships. This crate implements that container layer: it
//! addresses, stores, retrieves, and cross-references the parts, enforces the
//! structural invariants the format requires, and bounds resource consumption
//! so a crafted file cannot force unbounded allocation. Part *bodies* are
//! opaque bytes here; parsing worksheet or style XML belongs to the document
//! model built on top.
//!
//! # Features
//!
//! - **Lazy part loading**: bodies stay compressed until first access
//! - **Typed relationship graphs**: per-part and package-level, with
//!   two-phase part/relationship creation checked at save time
//! - **Deterministic output**: repeated saves of unchanged input are
//!   byte-identical
//! - **Defensive parsing**: malformed archives, traversal entry names, and
//!   adversarial declared sizes are rejected or clamped
//!
//! # Example - Reading a workbook package
//!
//! ```no_run
//! use pomelo::package::OpcPackage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pkg = OpcPackage::open("book.xlsx")?;
//!
//! // The root office-document relationship points at the workbook part
//! let workbook = pkg.main_part()?;
//! let xml = pkg.get_part(&workbook)?;
//! println!("workbook body: {} bytes", xml.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Building a package from scratch
//!
//! ```
//! use pomelo::constants::{content_type, relationship_type};
//! use pomelo::package::OpcPackage;
//! use pomelo::packuri::PackURI;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pkg = OpcPackage::new();
//!
//! let workbook = PackURI::new("/xl/workbook.xml")?;
//! pkg.add_part(
//!     workbook.clone(),
//!     content_type::SML_SHEET_MAIN,
//!     b"<workbook/>".to_vec(),
//! )?;
//! pkg.relate_to(&workbook, relationship_type::OFFICE_DOCUMENT);
//!
//! let bytes = pkg.save_to_bytes()?;
//! # assert!(!bytes.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod content_types;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use content_types::ContentTypes;
pub use error::{OpcError, Result, SaveProblem};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use rel::{Relationship, Relationships};
