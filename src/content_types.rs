//! The content-type registry backed by the [Content_Types].xml part.
//!
//! Implements the OPC content type discovery algorithm using Default and
//! Override declarations: an exact-partname override wins over the
//! extension-based default. The registry is owned by the package and mutated
//! as parts are added and removed; serialization back to XML is deterministic
//! so repeated saves of unchanged input stay byte-stable.

use crate::constants::content_type as ct;
use crate::error::{OpcError, Result};
use crate::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Default and override content-type declarations for a package.
#[derive(Debug)]
pub struct ContentTypes {
    /// Maps lowercased file extensions to default content types
    defaults: HashMap<String, String>,

    /// Maps specific partnames to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// Create a registry pre-loaded with the declarations every spreadsheet
    /// package carries: the `rels` and `xml` defaults.
    pub fn with_standard_defaults() -> Self {
        let mut types = Self::new();
        types.set_default("rels", ct::OPC_RELATIONSHIPS);
        types.set_default("xml", ct::XML);
        types
    }

    /// Parse the declarations of a [Content_Types].xml part.
    ///
    /// Uses quick-xml for efficient streaming XML parsing with minimal allocation.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut types = Self::new();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Default" => {
                            // <Default Extension="xml" ContentType="application/xml"/>
                            let mut extension = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"Extension" => {
                                        extension = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(ext), Some(ct)) = (extension, content_type) {
                                types.set_default(&ext, &ct);
                            }
                        },
                        b"Override" => {
                            // <Override PartName="/xl/workbook.xml" ContentType="..."/>
                            let mut partname = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"PartName" => {
                                        partname = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(pn), Some(ct)) = (partname, content_type) {
                                let uri = PackURI::new(pn).map_err(OpcError::InvalidPackUri)?;
                                types.set_override(&uri, &ct);
                            }
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::MalformedPackage(format!(
                        "content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Resolve the content type for a partname.
    ///
    /// An exact-partname override wins; otherwise the lowercased extension is
    /// looked up among the defaults.
    pub fn content_type_for(&self, partname: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(partname.as_str()) {
            return Ok(ct);
        }

        let ext = partname.ext().to_ascii_lowercase();
        if let Some(ct) = self.defaults.get(&ext) {
            return Ok(ct);
        }

        Err(OpcError::ContentTypeNotFound(partname.to_string()))
    }

    /// Add a default content type mapping for a file extension.
    pub fn set_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }

    /// Add an override content type mapping for a specific partname.
    pub fn set_override(&mut self, partname: &PackURI, content_type: &str) {
        self.overrides
            .insert(partname.to_string(), content_type.to_string());
    }

    /// Remove the override for a partname, if any.
    ///
    /// Defaults are never removed implicitly; other parts may still rely on them.
    pub fn remove_override(&mut self, partname: &PackURI) {
        self.overrides.remove(partname.as_str());
    }

    /// Register the content type of a newly added part.
    ///
    /// Well-known extension/type pairs become Default declarations so the
    /// emitted XML matches what spreadsheet producers conventionally write;
    /// everything else is declared as an Override for the exact partname.
    pub fn register(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext();

        if Self::is_standard_default(ext, content_type) {
            self.set_default(ext, content_type);
        } else {
            self.set_override(partname, content_type);
        }
    }

    /// Check if an extension/content-type pair is a standard default.
    fn is_standard_default(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tiff", ct::TIFF)
                | ("emf", ct::X_EMF)
                | ("wmf", ct::X_WMF)
        )
    }

    /// Whether an override is declared for this exact partname.
    pub fn has_override(&self, partname: &PackURI) -> bool {
        self.overrides.contains_key(partname.as_str())
    }

    /// Iterate declared override partnames.
    pub fn override_partnames(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    /// Copy of this registry keeping only the overrides `keep` accepts.
    ///
    /// Serialization uses this to drop overrides whose part no longer exists
    /// (a loaded archive may declare them); defaults always survive.
    pub(crate) fn pruned(&self, keep: impl Fn(&str) -> bool) -> ContentTypes {
        ContentTypes {
            defaults: self.defaults.clone(),
            overrides: self
                .overrides
                .iter()
                .filter(|(partname, _)| keep(partname))
                .map(|(partname, ct)| (partname.clone(), ct.clone()))
                .collect(),
        }
    }

    /// Generate the XML for [Content_Types].xml.
    ///
    /// Defaults are emitted sorted by extension, then overrides sorted by
    /// partname, keeping the output byte-stable across repeated saves.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push('\n');

        let mut exts: Vec<_> = self.defaults.keys().collect();
        exts.sort();
        for ext in exts {
            let content_type = &self.defaults[ext];
            xml.push_str(&format!(
                r#"  <Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
            xml.push('\n');
        }

        let mut partnames: Vec<_> = self.overrides.keys().collect();
        partnames.sort();
        for partname in partnames {
            let content_type = &self.overrides[partname];
            xml.push_str(&format!(
                r#"  <Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
            xml.push('\n');
        }

        xml.push_str("</Types>");

        xml
    }
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self::with_standard_defaults()
    }
}

/// Escape XML special characters.
#[inline]
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
