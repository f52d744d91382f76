use crate::constants::target_mode;
use crate::error::{OpcError, Result};
use crate::packuri::PackURI;
/// Relationship-related objects for OPC packages.
///
/// This module provides types for managing relationships between parts in an OPC
/// package, including internal and external relationships. Each graph belongs to
/// exactly one owning part (or to the package root) and enforces id uniqueness
/// within itself. Target existence is deliberately NOT checked here: a
/// relationship may be added before its target part is created, and the package
/// validates the pairing once, at save time.
use std::collections::HashMap;

/// A single relationship from a source part to a target.
///
/// Represents a connection between parts in an OPC package, identified by an rId
/// (relationship ID). Can be either internal (pointing to another part) or
/// external (pointing to an external URL).
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a relative part reference or external URL
    target_ref: String,

    /// Base URI for resolving relative references
    base_uri: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference.
    ///
    /// For internal relationships, this is a relative part reference.
    /// For external relationships, this is an absolute URL.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Get the absolute target partname for internal relationships.
    ///
    /// The relative target reference is resolved against the owning part's
    /// directory per OPC rules. An external relationship has no partname and
    /// yields a typed error rather than a coerced path.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::ExternalTarget(format!(
                "{} -> {}",
                self.r_id, self.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Collection of relationships from a single source.
///
/// Uses a HashMap for O(1) lookup by relationship ID. Ids follow the OPC
/// "rIdN" convention and are allocated monotonically: once an id has been
/// handed out it is never reused, even after the relationship is removed, so
/// XML that still cites an old id cached elsewhere can never silently bind to
/// an unrelated edge.
#[derive(Debug)]
pub struct Relationships {
    /// Base URI for resolving relative references
    base_uri: String,

    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,

    /// Next numeric suffix to allocate; only ever increases
    next_num: u32,
}

impl Relationships {
    /// Create a new empty relationships collection.
    ///
    /// # Arguments
    /// * `base_uri` - Base URI for resolving relative references (the owning
    ///   part's directory, or "/" for the package root)
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
            next_num: 1,
        }
    }

    /// Get the base URI relative references resolve against.
    #[inline]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Add a relationship with a freshly allocated id.
    ///
    /// # Returns
    /// Reference to the newly added relationship
    pub fn add(&mut self, reltype: &str, target_ref: &str, is_external: bool) -> &Relationship {
        let r_id = format!("rId{}", self.next_num);
        self.next_num += 1;

        let rel = Relationship::new(
            r_id.clone(),
            reltype.to_string(),
            target_ref.to_string(),
            self.base_uri.clone(),
            is_external,
        );
        self.rels.insert(r_id.clone(), rel);
        // Safe to unwrap since we just inserted it
        self.rels.get(r_id.as_str()).unwrap()
    }

    /// Insert a relationship with an explicit id, as read from a .rels part.
    ///
    /// A duplicate id within one graph makes the package malformed. Numeric
    /// "rIdN" ids advance the allocator so later additions never collide.
    pub fn load(
        &mut self,
        r_id: &str,
        reltype: &str,
        target_ref: &str,
        is_external: bool,
    ) -> Result<&Relationship> {
        if self.rels.contains_key(r_id) {
            return Err(OpcError::MalformedPackage(format!(
                "duplicate relationship id '{}' in rels of '{}'",
                r_id, self.base_uri
            )));
        }

        if let Some(num) = r_id_number(r_id) {
            self.next_num = self.next_num.max(num.saturating_add(1));
        }

        let rel = Relationship::new(
            r_id.to_string(),
            reltype.to_string(),
            target_ref.to_string(),
            self.base_uri.clone(),
            is_external,
        );
        self.rels.insert(r_id.to_string(), rel);
        Ok(self.rels.get(r_id).unwrap())
    }

    /// Get a relationship by its ID.
    pub fn get(&self, r_id: &str) -> Result<&Relationship> {
        self.rels
            .get(r_id)
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {}", r_id)))
    }

    /// Remove a relationship by its ID.
    ///
    /// The id is retired, not recycled: a subsequent [`add`](Self::add) will
    /// not hand it out again.
    pub fn remove(&mut self, r_id: &str) -> Result<Relationship> {
        self.rels
            .remove(r_id)
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {}", r_id)))
    }

    /// Get all relationships of a type, as a snapshot at call time.
    ///
    /// Ordered by numeric id for deterministic traversal.
    pub fn by_type(&self, reltype: &str) -> Vec<&Relationship> {
        let mut matching: Vec<&Relationship> = self
            .rels
            .values()
            .filter(|rel| rel.reltype() == reltype)
            .collect();
        matching.sort_by_key(|rel| sort_key(rel.r_id()));
        matching
    }

    /// Get the single relationship of a specific type.
    ///
    /// Returns an error if no relationship of the type is found,
    /// or if multiple relationships of the type exist.
    pub fn single_of_type(&self, reltype: &str) -> Result<&Relationship> {
        let matching = self.by_type(reltype);

        match matching.len() {
            0 => Err(OpcError::RelationshipNotFound(format!(
                "no relationship of type '{}'",
                reltype
            ))),
            1 => Ok(matching[0]),
            _ => Err(OpcError::InvalidRelationship(format!(
                "multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    /// Get or add an internal relationship to a target.
    ///
    /// If a relationship of the given type to the target already exists,
    /// returns that relationship. Otherwise, creates a new one with the
    /// next available rId.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> &Relationship {
        for rel in self.rels.values() {
            if rel.reltype() == reltype && rel.target_ref() == target_ref && !rel.is_external() {
                // Return the rId to look it up again (to avoid borrow checker issues)
                let r_id = rel.r_id().to_string();
                return self.rels.get(&r_id).unwrap();
            }
        }

        self.add(reltype, target_ref, false)
    }

    /// Get or add an external relationship.
    ///
    /// Similar to `get_or_add` but for external relationships.
    pub fn get_or_add_external(&mut self, reltype: &str, target_ref: &str) -> String {
        for rel in self.rels.values() {
            if rel.reltype() == reltype && rel.target_ref() == target_ref && rel.is_external() {
                return rel.r_id().to_string();
            }
        }

        self.add(reltype, target_ref, true).r_id().to_string()
    }

    /// Get an iterator over all relationships.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize relationships to XML format.
    ///
    /// Generates the XML for a .rels part, with relationships sorted by
    /// numeric id for consistent output.
    pub fn to_xml(&self) -> String {
        use crate::content_types::escape_xml;

        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        xml.push('\n');

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by_key(|rel| sort_key(rel.r_id()));

        for rel in rels {
            let mode = if rel.is_external() {
                format!(r#" TargetMode="{}""#, target_mode::EXTERNAL)
            } else {
                String::new()
            };

            xml.push_str(&format!(
                r#"  <Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
                mode
            ));
            xml.push('\n');
        }

        xml.push_str("</Relationships>");

        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

/// Extract the numeric suffix from an "rIdN" id using fast byte parsing.
fn r_id_number(r_id: &str) -> Option<u32> {
    if r_id.len() > 3 && &r_id[..3] == "rId" {
        atoi_simd::parse::<u32, false, false>(&r_id.as_bytes()[3..]).ok()
    } else {
        None
    }
}

/// Ordering key: numeric "rIdN" ids first in numeric order, everything else
/// after, lexicographically.
fn sort_key(r_id: &str) -> (u32, String) {
    match r_id_number(r_id) {
        Some(num) => (num, String::new()),
        None => (u32::MAX, r_id.to_string()),
    }
}
