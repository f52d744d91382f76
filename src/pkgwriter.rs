//! Package writer for OPC packages.
//!
//! This module serializes a package to ZIP bytes: the [Content_Types].xml
//! part, the package-level and per-part relationship parts, and all part
//! bodies. Serialization is preceded by the package-wide validation pass —
//! the single enforcement point for the invariants that mutation deliberately
//! does not check (two-phase part/relationship creation). A failed validation
//! aborts the save before any bytes exist.

use crate::error::{OpcError, Result, SaveProblem};
use crate::package::OpcPackage;
use crate::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::phys_pkg::PhysPkgWriter;
use std::path::Path;

/// Package writer that serializes an OPC package to a ZIP archive.
///
/// # Example
///
/// ```no_run
/// use pomelo::package::OpcPackage;
/// use pomelo::pkgwriter::PackageWriter;
///
/// let mut pkg = OpcPackage::new();
/// // ... add parts to package ...
/// PackageWriter::write("output.xlsx", &pkg)?;
/// # Ok::<(), pomelo::error::OpcError>(())
/// ```
pub struct PackageWriter;

impl PackageWriter {
    /// Write an OPC package to a file.
    pub fn write<P: AsRef<Path>>(path: P, package: &OpcPackage) -> Result<()> {
        let bytes = Self::to_bytes(package)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Write an OPC package to a stream.
    pub fn write_to_stream<W: std::io::Write>(mut writer: W, package: &OpcPackage) -> Result<()> {
        let bytes = Self::to_bytes(package)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Serialize an OPC package to bytes.
    ///
    /// Validates first; a package with dangling relationship targets or
    /// parts lacking a resolvable content type fails as a whole and produces
    /// no output. Output is deterministic: content types, root relationships,
    /// then parts in partname order, each followed by its relationships.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let problems = Self::validate(package);
        if !problems.is_empty() {
            for problem in &problems {
                tracing::warn!(problem = %problem, "package failed save validation");
            }
            return Err(OpcError::InvalidPackage(problems));
        }

        let mut phys_writer = PhysPkgWriter::new();

        Self::write_content_types(&mut phys_writer, package)?;
        Self::write_pkg_rels(&mut phys_writer, package)?;
        Self::write_parts(&mut phys_writer, package)?;

        phys_writer.finish()
    }

    /// Check every cross-part invariant the mutation API defers.
    ///
    /// All violations are collected — a multi-step edit that went wrong in
    /// several places reports every problem at once, in deterministic order.
    pub fn validate(package: &OpcPackage) -> Vec<SaveProblem> {
        let mut problems = Vec::new();

        let mut graphs: Vec<_> = package.iter_rels().collect();
        graphs.sort_unstable_by_key(|(owner, _)| *owner);

        for (owner, rels) in graphs {
            let mut edges: Vec<_> = rels.iter().collect();
            edges.sort_by_key(|rel| rel.r_id().to_string());

            for rel in edges {
                if rel.is_external() {
                    continue;
                }
                match rel.target_partname() {
                    Ok(target) => {
                        if !package.contains_part(&target) {
                            problems.push(SaveProblem::DanglingRelationship {
                                source: owner.to_string(),
                                r_id: rel.r_id().to_string(),
                                target: target.to_string(),
                            });
                        }
                    },
                    Err(_) => {
                        problems.push(SaveProblem::UnresolvableTarget {
                            source: owner.to_string(),
                            r_id: rel.r_id().to_string(),
                            target_ref: rel.target_ref().to_string(),
                        });
                    },
                }
            }
        }

        for partname in package.iter_partnames() {
            if package.content_type_for(partname).is_err() {
                problems.push(SaveProblem::MissingContentType {
                    partname: partname.to_string(),
                });
            }
        }

        problems
    }

    /// Write the [Content_Types].xml part.
    ///
    /// Overrides for partnames that no longer exist are dropped on the way
    /// out — no dangling override survives a successful save.
    fn write_content_types(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let content_types = package.content_types().pruned(|partname| {
            match PackURI::new(partname) {
                Ok(uri) => {
                    let exists = package.contains_part(&uri);
                    if !exists {
                        tracing::debug!(partname, "dropping content-type override for missing part");
                    }
                    exists
                },
                Err(_) => false,
            }
        });

        let uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        phys_writer.write(&uri, content_types.to_xml().as_bytes())
    }

    /// Write package-level relationships (_rels/.rels).
    ///
    /// Always emitted, even when empty: the root relationships part is a
    /// required entry of the persisted layout.
    fn write_pkg_rels(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        phys_writer.write(&package_uri.rels_uri(), package.rels().to_xml().as_bytes())
    }

    /// Write all parts and their relationships, in partname order.
    fn write_parts(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        for partname in package.iter_partnames() {
            // Materializes lazily loaded bodies on the way out
            let blob = package.get_part(partname)?;
            phys_writer.write(partname, blob)?;

            if let Some(rels) = package.part_rels(partname) {
                if !rels.is_empty() {
                    phys_writer.write(&partname.rels_uri(), rels.to_xml().as_bytes())?;
                }
            }
        }

        Ok(())
    }
}
