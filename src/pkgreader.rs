//! Low-level, read-only API to a serialized Open Packaging Convention (OPC) package.
//!
//! This module turns the physical archive into the serialized form the package
//! unmarshals from: the content-type registry, the set of partnames, and the
//! relationships parsed from every .rels entry. Part bodies are deliberately
//! not read here — they stay in the archive until first access.

use crate::constants::{limits, target_mode};
use crate::content_types::ContentTypes;
use crate::error::{OpcError, Result};
use crate::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::phys_pkg::PhysPkgReader;
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Serialized relationship as read from a .rels part.
///
/// Contains all relationship information in string form, before being
/// converted into Relationship objects in the package's graphs.
#[derive(Debug, Clone)]
pub struct SerializedRelationship {
    /// Base URI for resolving relative references
    pub base_uri: String,

    /// Relationship ID (e.g., "rId1")
    pub r_id: String,

    /// Relationship type URI
    pub reltype: String,

    /// Target reference (relative URI or external URL)
    pub target_ref: String,

    /// Target mode (Internal or External)
    pub target_mode: String,
}

impl SerializedRelationship {
    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }
}

/// Inline capacity covers the relationship count of typical parts
pub type SerializedRels = SmallVec<[SerializedRelationship; 8]>;

/// Package reader that provides the serialized form of a package.
///
/// Parses `[Content_Types].xml` and every `.rels` entry up front — both are
/// required to interpret the rest of the package — and records partnames for
/// everything else without touching the bodies.
pub struct PackageReader {
    /// Content-type declarations from [Content_Types].xml
    content_types: ContentTypes,

    /// Partnames of all ordinary parts (everything except the content-types
    /// part and the .rels parts)
    partnames: Vec<PackURI>,

    /// Relationships keyed by owner partname ("/" for the package root)
    srels_by_owner: HashMap<String, SerializedRels>,
}

impl PackageReader {
    /// Read the serialized form of a package from a physical reader.
    ///
    /// Fails with a malformed-package error when `[Content_Types].xml` is
    /// missing or unparsable, when an entry name is not a valid partname, or
    /// when any `.rels` entry contains malformed XML. A part without a
    /// `.rels` entry — or with an empty one — simply has no relationships.
    pub fn from_phys_reader(phys_reader: &mut PhysPkgReader) -> Result<Self> {
        let content_types_xml = match phys_reader.content_types_xml() {
            Ok(xml) => xml,
            Err(OpcError::PartNotFound(_)) => {
                return Err(OpcError::MalformedPackage(
                    "missing [Content_Types].xml".to_string(),
                ));
            },
            Err(e) => return Err(e),
        };
        let content_types = ContentTypes::from_xml(&content_types_xml)?;

        let names = phys_reader.member_names();
        // The archive's entry count is untrusted input
        let mut partnames = Vec::with_capacity(limits::clamp_reserve(names.len()));
        let mut rels_parts: Vec<(PackURI, PackURI)> = Vec::new();

        for name in &names {
            if name.ends_with('/') {
                // Directory placeholder entries carry no content
                continue;
            }

            let uri = PackURI::new(format!("/{}", name)).map_err(|e| {
                OpcError::MalformedPackage(format!("invalid entry name '{}': {}", name, e))
            })?;
            if uri.membername() != name {
                // Non-canonical entry names ("a/./b", "a//b") are how crafted
                // archives smuggle aliased parts
                return Err(OpcError::MalformedPackage(format!(
                    "non-canonical entry name '{}'",
                    name
                )));
            }

            if uri.as_str() == CONTENT_TYPES_URI {
                continue;
            }

            match uri.rels_owner() {
                Some(owner) => rels_parts.push((uri, owner)),
                None => partnames.push(uri),
            }
        }

        let mut srels_by_owner = HashMap::with_capacity(limits::clamp_reserve(rels_parts.len()));
        for (rels_uri, owner) in rels_parts {
            let rels_xml = phys_reader.blob_for(&rels_uri)?;
            let base_uri = if owner.as_str() == "/" {
                "/".to_string()
            } else {
                owner.base_uri().to_string()
            };
            let srels = parse_rels_xml(&rels_xml, &base_uri).map_err(|e| {
                OpcError::MalformedPackage(format!("rels part {}: {}", rels_uri, e))
            })?;
            srels_by_owner.insert(owner.to_string(), srels);
        }

        tracing::debug!(
            parts = partnames.len(),
            rels_graphs = srels_by_owner.len(),
            "read serialized package"
        );

        Ok(Self {
            content_types,
            partnames,
            srels_by_owner,
        })
    }

    /// Take ownership of the content-type registry.
    pub fn take_content_types(&mut self) -> ContentTypes {
        std::mem::take(&mut self.content_types)
    }

    /// Take ownership of the partname list.
    pub fn take_partnames(&mut self) -> Vec<PackURI> {
        std::mem::take(&mut self.partnames)
    }

    /// Take ownership of the per-owner serialized relationships.
    pub fn take_srels(&mut self) -> HashMap<String, SerializedRels> {
        std::mem::take(&mut self.srels_by_owner)
    }
}

/// Parse relationships XML into SerializedRelationship structs.
///
/// `base_uri` is the owning part's directory ("/" for the package root);
/// it travels with each relationship so targets can be resolved later.
fn parse_rels_xml(rels_xml: &[u8], base_uri: &str) -> Result<SerializedRels> {
    let mut srels = SerializedRels::new();
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut target_mode = target_mode::INTERNAL.to_string();

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                            b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => target_mode = attr.unescape_value()?.to_string(),
                            _ => {},
                        }
                    }

                    if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                        srels.push(SerializedRelationship {
                            base_uri: base_uri.to_string(),
                            r_id: id,
                            reltype: rt,
                            target_ref: tr,
                            target_mode,
                        });
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::MalformedPackage(format!("rels parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(srels)
}
