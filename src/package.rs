//! Objects that implement reading and writing OPC packages.
//!
//! This module provides the main OpcPackage type, which represents an Open
//! Packaging Convention package in memory: the set of parts, the content-type
//! registry, and one relationship graph per owning part plus the package-root
//! graph. All cross-component invariants are enforced here (and at the save
//! boundary), not distributed across callers.
//!
//! A package is created empty or loaded from an archive; a failed load yields
//! an error, never a half-usable package. Saving is a side-effecting read —
//! the package remains usable afterwards, so repeated saves are fine.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path as FsPath;

use parking_lot::Mutex;

use crate::constants::{limits, relationship_type};
use crate::content_types::ContentTypes;
use crate::error::{OpcError, Result};
use crate::packuri::{PACKAGE_URI, PackURI};
use crate::part::Part;
use crate::phys_pkg::PhysPkgReader;
use crate::pkgreader::PackageReader;
use crate::pkgwriter::PackageWriter;
use crate::rel::Relationships;

/// Main API class for working with OPC packages.
///
/// Part bodies loaded from an archive are materialized lazily: the archive
/// handle is retained and a body is decompressed on first [`get_part`]
/// access, then cached for the lifetime of the package. The cache is
/// compute-once and safe to race on from multiple reader threads; mutation
/// requires `&mut self` as usual.
///
/// [`get_part`]: Self::get_part
pub struct OpcPackage {
    /// Retained archive for lazy materialization; None for packages built
    /// from scratch
    archive: Option<Mutex<PhysPkgReader>>,

    /// All parts in the package, keyed by partname; ordered so that
    /// serialization is deterministic
    parts: BTreeMap<String, Part>,

    /// Content-type declarations, the single authority for part types
    content_types: ContentTypes,

    /// Relationship graphs keyed by owner partname, with the package-root
    /// graph under "/". Graphs live here rather than inside parts because
    /// relationships are known before part bodies are loaded, and may be
    /// created before their owner part exists (two-phase add).
    rels: HashMap<String, Relationships>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    ///
    /// The standard `rels`/`xml` content-type defaults are pre-registered.
    pub fn new() -> Self {
        let mut rels = HashMap::new();
        rels.insert(
            PACKAGE_URI.to_string(),
            Relationships::new(PACKAGE_URI.to_string()),
        );
        Self {
            archive: None,
            parts: BTreeMap::new(),
            content_types: ContentTypes::with_standard_defaults(),
            rels,
        }
    }

    /// Open an OPC package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use pomelo::package::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("book.xlsx").unwrap();
    /// ```
    pub fn open<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::open(path)?)
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::from_reader(reader)?)
    }

    /// Load an OPC package from archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::from_bytes(data)?)
    }

    fn from_phys_reader(mut phys_reader: PhysPkgReader) -> Result<Self> {
        let pkg_reader = PackageReader::from_phys_reader(&mut phys_reader)?;
        Self::unmarshal(pkg_reader, phys_reader)
    }

    /// Unmarshal a package from its serialized form.
    ///
    /// Builds lazy parts for every partname and loads every relationship
    /// graph; part bodies stay in the archive until first access.
    fn unmarshal(mut pkg_reader: PackageReader, phys_reader: PhysPkgReader) -> Result<Self> {
        let content_types = pkg_reader.take_content_types();
        let partnames = pkg_reader.take_partnames();
        let srels_by_owner = pkg_reader.take_srels();

        let mut parts = BTreeMap::new();
        for partname in partnames {
            parts.insert(partname.to_string(), Part::new_lazy(partname));
        }

        let mut rels: HashMap<String, Relationships> =
            HashMap::with_capacity(limits::clamp_reserve(srels_by_owner.len() + 1));
        rels.insert(
            PACKAGE_URI.to_string(),
            Relationships::new(PACKAGE_URI.to_string()),
        );

        for (owner, srels) in srels_by_owner {
            let base_uri = if owner == PACKAGE_URI {
                PACKAGE_URI.to_string()
            } else {
                PackURI::new(&owner)
                    .map_err(OpcError::InvalidPackUri)?
                    .base_uri()
                    .to_string()
            };
            let graph = rels
                .entry(owner)
                .or_insert_with(|| Relationships::new(base_uri));
            for srel in srels {
                graph.load(&srel.r_id, &srel.reltype, &srel.target_ref, srel.is_external())?;
            }
        }

        Ok(Self {
            archive: Some(Mutex::new(phys_reader)),
            parts,
            content_types,
            rels,
        })
    }

    /// Get the bytes of a part by its partname.
    ///
    /// The first access to a lazily loaded part decompresses it through the
    /// retained archive handle; the result is cached for the lifetime of the
    /// package, and concurrent first accesses decompress exactly once.
    pub fn get_part(&self, partname: &PackURI) -> Result<&[u8]> {
        let part = self
            .parts
            .get(partname.as_str())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))?;

        part.blob_or_init(|| match &self.archive {
            Some(archive) => archive.lock().blob_for(part.partname()),
            // Parts are only created lazy while unmarshalling, which retains
            // the archive; reaching this means the part map was corrupted
            None => Err(OpcError::PartNotFound(part.partname().to_string())),
        })
    }

    /// Add a new part to the package.
    ///
    /// Fails when the partname is already taken; the existing part keeps its
    /// content. The content type is registered as a Default declaration for
    /// well-known extension pairs, otherwise as an Override for this exact
    /// partname.
    pub fn add_part(&mut self, partname: PackURI, content_type: &str, blob: Vec<u8>) -> Result<()> {
        if self.parts.contains_key(partname.as_str()) {
            return Err(OpcError::PartAlreadyExists(partname.to_string()));
        }

        self.content_types.register(&partname, content_type);
        self.parts
            .insert(partname.to_string(), Part::new(partname, blob));
        Ok(())
    }

    /// Replace the bytes of an existing part.
    pub fn replace_part(&mut self, partname: &PackURI, blob: Vec<u8>) -> Result<()> {
        let part = self
            .parts
            .get_mut(partname.as_str())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))?;
        part.set_blob(blob);
        Ok(())
    }

    /// Remove a part from the package.
    ///
    /// Drops the part's own relationship graph and its content-type override.
    /// Relationships elsewhere that target the removed part are left in the
    /// graph — silently deleting them could mask a caller bug — and surface
    /// as dangling-target failures when the package is saved.
    pub fn remove_part(&mut self, partname: &PackURI) -> Result<()> {
        if self.parts.remove(partname.as_str()).is_none() {
            return Err(OpcError::PartNotFound(partname.to_string()));
        }

        self.rels.remove(partname.as_str());
        self.content_types.remove_override(partname);
        tracing::debug!(partname = %partname, "removed part");
        Ok(())
    }

    /// Check if a part exists in the package.
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname.as_str())
    }

    /// Get the number of parts in the package.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Iterate all partnames in canonical order.
    pub fn iter_partnames(&self) -> impl Iterator<Item = &PackURI> {
        self.parts.values().map(Part::partname)
    }

    /// Resolve the content type of a part via the registry.
    pub fn content_type_for(&self, partname: &PackURI) -> Result<&str> {
        self.content_types.content_type_for(partname)
    }

    /// Get a reference to the content-type registry.
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Get mutable access to the content-type registry.
    pub fn content_types_mut(&mut self) -> &mut ContentTypes {
        &mut self.content_types
    }

    /// Get a reference to the package-level relationships.
    pub fn rels(&self) -> &Relationships {
        // The root graph is created by every constructor
        self.rels
            .get(PACKAGE_URI)
            .expect("package root relationship graph always exists")
    }

    /// Get a mutable reference to the package-level relationships.
    pub fn rels_mut(&mut self) -> &mut Relationships {
        self.rels
            .entry(PACKAGE_URI.to_string())
            .or_insert_with(|| Relationships::new(PACKAGE_URI.to_string()))
    }

    /// Get the relationship graph owned by a part, if one exists.
    pub fn part_rels(&self, partname: &PackURI) -> Option<&Relationships> {
        self.rels.get(partname.as_str())
    }

    /// Get mutable access to the relationship graph owned by a part,
    /// creating an empty graph on first use.
    ///
    /// The part itself need not exist yet: adding a relationship before its
    /// owner or target part is a supported transient state, checked only
    /// when the package is saved.
    pub fn part_rels_mut(&mut self, partname: &PackURI) -> &mut Relationships {
        self.rels
            .entry(partname.to_string())
            .or_insert_with(|| Relationships::new(partname.base_uri().to_string()))
    }

    /// Iterate all relationship graphs as (owner partname, graph) pairs.
    ///
    /// The package-root graph appears under "/".
    pub fn iter_rels(&self) -> impl Iterator<Item = (&str, &Relationships)> {
        self.rels.iter().map(|(owner, rels)| (owner.as_str(), rels))
    }

    /// Relate the package root to a part, reusing an existing edge of the
    /// same type and target if present.
    ///
    /// # Returns
    /// The relationship ID (rId)
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> String {
        let target_ref = partname.relative_ref(PACKAGE_URI);
        self.rels_mut()
            .get_or_add(reltype, &target_ref)
            .r_id()
            .to_string()
    }

    /// Relate one part to another, reusing an existing edge of the same type
    /// and target if present.
    ///
    /// Neither part has to exist yet — see [`part_rels_mut`](Self::part_rels_mut).
    pub fn relate_part_to(&mut self, source: &PackURI, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(source.base_uri());
        self.part_rels_mut(source)
            .get_or_add(reltype, &target_ref)
            .r_id()
            .to_string()
    }

    /// Get the partname of the main document part — the workbook, for a
    /// spreadsheet package — by resolving the office-document relationship
    /// of the package root.
    pub fn main_part(&self) -> Result<PackURI> {
        self.rels()
            .single_of_type(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    /// Find the next available partname for a part template.
    ///
    /// Useful for creating new parts with sequential numbering
    /// (e.g., sheet1.xml, sheet2.xml).
    ///
    /// # Arguments
    /// * `template` - A format string with a %d placeholder for the number
    ///
    /// # Example
    /// ```no_run
    /// # use pomelo::package::OpcPackage;
    /// # let mut pkg = OpcPackage::new();
    /// let next_sheet = pkg.next_partname("/xl/worksheets/sheet%d.xml");
    /// ```
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        let mut n = 1u32;
        loop {
            let candidate = template.replace("%d", &n.to_string());
            if !self.parts.contains_key(candidate.as_str()) {
                return PackURI::new(candidate).map_err(OpcError::InvalidPackUri);
            }
            n += 1;
            if n > 10000 {
                // Safety limit to prevent infinite loops
                return Err(OpcError::InvalidPackUri(
                    "too many parts, cannot find next partname".to_string(),
                ));
            }
        }
    }

    /// Serialize the package to archive bytes.
    ///
    /// Validates every deferred invariant first — internal relationship
    /// targets must exist as parts, every part must have a resolvable
    /// content type — and fails as a whole, producing no bytes, when any
    /// check fails. See [`PackageWriter::validate`].
    pub fn save_to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }

    /// Serialize the package to a file.
    pub fn save<P: AsRef<FsPath>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::content_type as ct;
    use crate::error::SaveProblem;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#;

    const ROOT_RELS: &[u8] = br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

    const WORKBOOK: &[u8] = br#"<?xml version="1.0"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#;

    fn create_minimal_xlsx() -> Vec<u8> {
        let mut zip_data = Vec::new();
        {
            let cursor = Cursor::new(&mut zip_data);
            let mut writer = ZipWriter::new(cursor);
            let options = SimpleFileOptions::default();

            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(CONTENT_TYPES).unwrap();

            writer.start_file("_rels/.rels", options).unwrap();
            writer.write_all(ROOT_RELS).unwrap();

            writer.start_file("xl/workbook.xml", options).unwrap();
            writer.write_all(WORKBOOK).unwrap();

            writer.finish().unwrap();
        }
        zip_data
    }

    fn workbook_uri() -> PackURI {
        PackURI::new("/xl/workbook.xml").unwrap()
    }

    #[test]
    fn test_load_minimal_package() {
        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();

        assert_eq!(pkg.part_count(), 1);
        assert_eq!(pkg.get_part(&workbook_uri()).unwrap(), WORKBOOK);

        // The single root relationship resolves to the workbook
        let rels: Vec<_> = pkg.rels().iter().collect();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].target_partname().unwrap(), workbook_uri());
    }

    #[test]
    fn test_main_part() {
        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        assert_eq!(pkg.main_part().unwrap(), workbook_uri());
    }

    #[test]
    fn test_content_type_resolution() {
        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        assert_eq!(
            pkg.content_type_for(&workbook_uri()).unwrap(),
            ct::SML_SHEET_MAIN
        );
    }

    #[test]
    fn test_get_part_not_found() {
        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        let missing = PackURI::new("/xl/styles.xml").unwrap();
        assert!(matches!(
            pkg.get_part(&missing),
            Err(OpcError::PartNotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_get_part() {
        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        let uri = workbook_uri();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| pkg.get_part(&uri).unwrap().to_vec()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), WORKBOOK);
            }
        });
    }

    #[test]
    fn test_add_part_conflict_keeps_first_bytes() {
        let mut pkg = OpcPackage::new();
        let uri = PackURI::new("/xl/styles.xml").unwrap();

        pkg.add_part(uri.clone(), ct::SML_STYLES, b"first".to_vec())
            .unwrap();
        let second = pkg.add_part(uri.clone(), ct::SML_STYLES, b"second".to_vec());

        assert!(matches!(second, Err(OpcError::PartAlreadyExists(_))));
        assert_eq!(pkg.get_part(&uri).unwrap(), b"first");
    }

    #[test]
    fn test_replace_part() {
        let mut pkg = OpcPackage::new();
        let uri = PackURI::new("/xl/styles.xml").unwrap();

        assert!(matches!(
            pkg.replace_part(&uri, b"new".to_vec()),
            Err(OpcError::PartNotFound(_))
        ));

        pkg.add_part(uri.clone(), ct::SML_STYLES, b"old".to_vec())
            .unwrap();
        pkg.replace_part(&uri, b"new".to_vec()).unwrap();
        assert_eq!(pkg.get_part(&uri).unwrap(), b"new");
    }

    #[test]
    fn test_remove_part_leaves_dangling_relationship() {
        let mut pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();

        pkg.remove_part(&workbook_uri()).unwrap();

        // The root relationship is still there, now dangling
        assert_eq!(pkg.rels().len(), 1);

        let err = pkg.save_to_bytes().unwrap_err();
        match err {
            OpcError::InvalidPackage(problems) => {
                assert!(problems.iter().any(|p| matches!(
                    p,
                    SaveProblem::DanglingRelationship { target, .. }
                        if target == "/xl/workbook.xml"
                )));
            },
            other => panic!("expected InvalidPackage, got {:?}", other),
        }
    }

    #[test]
    fn test_two_phase_add_validated_at_save() {
        let mut pkg = OpcPackage::new();
        let sheet = PackURI::new("/xl/worksheets/sheet1.xml").unwrap();

        // Phase one: the relationship exists, the part does not
        let r_id = pkg.relate_to(&sheet, relationship_type::WORKSHEET);
        assert_eq!(r_id, "rId1");
        assert!(pkg.save_to_bytes().is_err());

        // Phase two: materialize the target, then the save goes through
        pkg.add_part(sheet.clone(), ct::SML_WORKSHEET, b"<worksheet/>".to_vec())
            .unwrap();
        let bytes = pkg.save_to_bytes().unwrap();

        let reloaded = OpcPackage::from_bytes(bytes).unwrap();
        assert_eq!(reloaded.get_part(&sheet).unwrap(), b"<worksheet/>");
    }

    #[test]
    fn test_relate_to_resolves_back_to_target() {
        let mut pkg = OpcPackage::new();
        let sheet = PackURI::new("/xl/worksheets/sheet1.xml").unwrap();

        let r_id = pkg.relate_to(&sheet, relationship_type::WORKSHEET);
        let rel = pkg.rels().get(&r_id).unwrap();
        assert_eq!(rel.target_partname().unwrap(), sheet);
    }

    #[test]
    fn test_relate_part_to() {
        let mut pkg = OpcPackage::new();
        let workbook = workbook_uri();
        let styles = PackURI::new("/xl/styles.xml").unwrap();

        let r_id = pkg.relate_part_to(&workbook, &styles, relationship_type::STYLES);
        let rel = pkg.part_rels(&workbook).unwrap().get(&r_id).unwrap();
        assert_eq!(rel.target_ref(), "styles.xml");
        assert_eq!(rel.target_partname().unwrap(), styles);
    }

    #[test]
    fn test_save_aggregates_all_problems() {
        let mut zip_data = Vec::new();
        {
            let cursor = Cursor::new(&mut zip_data);
            let mut writer = ZipWriter::new(cursor);
            let options = SimpleFileOptions::default();

            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(CONTENT_TYPES).unwrap();

            writer.start_file("_rels/.rels", options).unwrap();
            writer.write_all(ROOT_RELS).unwrap();

            // No content type resolves for the .bin extension
            writer.start_file("xl/custom.bin", options).unwrap();
            writer.write_all(b"\x00\x01").unwrap();

            writer.finish().unwrap();
        }

        // The workbook part named by the root relationship is absent, and
        // custom.bin has no resolvable content type: both reported at once
        let pkg = OpcPackage::from_bytes(zip_data).unwrap();
        let err = pkg.save_to_bytes().unwrap_err();
        match err {
            OpcError::InvalidPackage(problems) => {
                assert_eq!(problems.len(), 2);
                assert!(problems.iter().any(|p| matches!(p, SaveProblem::DanglingRelationship { .. })));
                assert!(problems.iter().any(|p| matches!(
                    p,
                    SaveProblem::MissingContentType { partname } if partname == "/xl/custom.bin"
                )));
            },
            other => panic!("expected InvalidPackage, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_saves_are_byte_stable() {
        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        let first = pkg.save_to_bytes().unwrap();
        let second = pkg.save_to_bytes().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_round_trip() {
        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        let bytes = pkg.save_to_bytes().unwrap();

        let reloaded = OpcPackage::from_bytes(bytes).unwrap();
        assert_eq!(reloaded.get_part(&workbook_uri()).unwrap(), WORKBOOK);
        assert_eq!(reloaded.main_part().unwrap(), workbook_uri());
        assert_eq!(
            reloaded.content_type_for(&workbook_uri()).unwrap(),
            ct::SML_SHEET_MAIN
        );
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        pkg.save(&path).unwrap();

        let reloaded = OpcPackage::open(&path).unwrap();
        assert_eq!(reloaded.get_part(&workbook_uri()).unwrap(), WORKBOOK);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            OpcPackage::open("/no/such/book.xlsx"),
            Err(OpcError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_next_partname() {
        let mut pkg = OpcPackage::new();
        let template = "/xl/worksheets/sheet%d.xml";

        let first = pkg.next_partname(template).unwrap();
        assert_eq!(first.as_str(), "/xl/worksheets/sheet1.xml");

        pkg.add_part(first, ct::SML_WORKSHEET, b"<worksheet/>".to_vec())
            .unwrap();
        assert_eq!(
            pkg.next_partname(template).unwrap().as_str(),
            "/xl/worksheets/sheet2.xml"
        );
    }

    #[test]
    fn test_stale_override_from_archive_is_pruned_at_save() {
        let mut zip_data = Vec::new();
        {
            let cursor = Cursor::new(&mut zip_data);
            let mut writer = ZipWriter::new(cursor);
            let options = SimpleFileOptions::default();

            // Declares an override for /xl/styles.xml, which is not present
            let content_types = br#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(content_types).unwrap();

            writer.start_file("_rels/.rels", options).unwrap();
            writer.write_all(ROOT_RELS).unwrap();

            writer.start_file("xl/workbook.xml", options).unwrap();
            writer.write_all(WORKBOOK).unwrap();

            writer.finish().unwrap();
        }

        let pkg = OpcPackage::from_bytes(zip_data).unwrap();
        let bytes = pkg.save_to_bytes().unwrap();

        let reloaded = OpcPackage::from_bytes(bytes).unwrap();
        let styles = PackURI::new("/xl/styles.xml").unwrap();
        assert!(!reloaded.content_types().has_override(&styles));
        assert!(
            reloaded
                .content_types()
                .has_override(&PackURI::new("/xl/workbook.xml").unwrap())
        );
    }

    #[test]
    fn test_removed_override_does_not_survive_save() {
        let mut pkg = OpcPackage::from_bytes(create_minimal_xlsx()).unwrap();
        pkg.remove_part(&workbook_uri()).unwrap();
        pkg.rels_mut().remove("rId1").unwrap();

        let bytes = pkg.save_to_bytes().unwrap();
        let reloaded = OpcPackage::from_bytes(bytes).unwrap();
        assert!(!reloaded.content_types().has_override(&workbook_uri()));
    }
}
