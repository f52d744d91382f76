/// Provides the PackURI value type and utilities for working with package URIs.
///
/// A PackURI represents a part name within an OPC package, following the URI format
/// defined by the Open Packaging Conventions specification.
/// Represents a package URI, which is a partname within an OPC package.
///
/// PackURIs always begin with a forward slash and use forward slashes as path
/// separators, following the OPC specification. A PackURI is stored in canonical
/// form: no empty or `.` segments, `..` resolved at construction. Comparison and
/// hashing are by the canonical string and are case-sensitive; partname case must
/// never be folded to match a host filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackURI {
    /// The canonical pack URI string (e.g., "/xl/workbook.xml")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string.
    ///
    /// The input is normalized: empty and `.` segments are dropped and `..`
    /// segments are resolved against the preceding segments.
    ///
    /// # Returns
    /// * `Ok(PackURI)` if the URI is valid
    /// * `Err` if the URI doesn't start with a forward slash, contains a
    ///   backslash, or a `..` segment would climb past the package root
    pub fn new<S: AsRef<str>>(uri: S) -> Result<Self, String> {
        let uri = uri.as_ref();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        if uri.contains('\\') {
            return Err(format!("PackURI must not contain backslash, got '{}'", uri));
        }
        Ok(PackURI {
            uri: Self::normalize(uri)?,
        })
    }

    /// Create a PackURI from a relative reference and a base URI.
    ///
    /// This translates a relative reference (like "../styles.xml") onto a base URI
    /// (like "/xl/worksheets") to produce an absolute PackURI (like "/xl/styles.xml").
    /// A relative reference that itself begins with a slash is already absolute and
    /// replaces the base entirely.
    ///
    /// Fails rather than truncating when the reference climbs past the package root.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        if relative_ref.starts_with('/') {
            return Self::new(relative_ref);
        }
        let joined = if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(joined)
    }

    /// Resolve `.` and `..` segments, dropping empty ones.
    ///
    /// The input must already begin with a slash. Errors when `..` would pop
    /// past the root.
    fn normalize(path: &str) -> Result<String, String> {
        let mut segments: Vec<&str> = Vec::new();

        for segment in path.split('/') {
            match segment {
                "" | "." => {},
                ".." => {
                    if segments.pop().is_none() {
                        return Err(format!(
                            "PackURI '{}' climbs past the package root",
                            path
                        ));
                    }
                },
                _ => segments.push(segment),
            }
        }

        if segments.is_empty() {
            // The package pseudo-partname
            return Ok("/".to_string());
        }

        let mut canonical = String::with_capacity(path.len());
        for segment in &segments {
            canonical.push('/');
            canonical.push_str(segment);
        }
        Ok(canonical)
    }

    /// Join a segment (or a relative multi-segment path) onto this PackURI.
    ///
    /// Joining an absolute segment replaces this URI rather than appending.
    pub fn join(&self, segment: &str) -> Result<Self, String> {
        if segment.starts_with('/') {
            return Self::new(segment);
        }
        Self::from_rel_ref(&self.uri, segment)
    }

    /// Get the parent of this PackURI, or None for the package pseudo-partname "/".
    pub fn parent(&self) -> Option<PackURI> {
        if self.uri == "/" {
            return None;
        }
        // base_uri of a canonical URI is itself canonical
        Some(PackURI {
            uri: self.base_uri().to_string(),
        })
    }

    /// Get the base URI (directory portion) of this PackURI.
    ///
    /// For example, "/xl/worksheets" for "/xl/worksheets/sheet1.xml".
    /// For the package pseudo-partname "/", returns "/".
    pub fn base_uri(&self) -> &str {
        if self.uri == "/" {
            return "/";
        }

        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Get the filename portion of this PackURI.
    ///
    /// For example, "sheet1.xml" for "/xl/worksheets/sheet1.xml".
    /// For the package pseudo-partname "/", returns an empty string.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Get the extension portion of this PackURI.
    ///
    /// For example, "xml" for "/xl/workbook.xml" (note: no leading period).
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// Get the partname index for tuple partnames, or None for singleton partnames.
    ///
    /// For example, returns 2 for "/xl/worksheets/sheet2.xml" and None for
    /// "/xl/workbook.xml".
    pub fn idx(&self) -> Option<u32> {
        let filename = self.filename();
        if filename.is_empty() {
            return None;
        }

        let name_part = match filename.rfind('.') {
            Some(pos) => &filename[..pos],
            None => filename,
        };

        // Numeric suffix only: "sheet21" -> 21, "21" alone is not a tuple name
        let digits_at = name_part
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i)?;

        if digits_at == 0 {
            return None;
        }
        name_part[digits_at..].parse::<u32>().ok()
    }

    /// Get the membername (URI with leading slash stripped).
    ///
    /// This is the form used as the Zip file membername for the package item.
    /// Returns an empty string for the package pseudo-partname "/".
    pub fn membername(&self) -> &str {
        if self.uri == "/" { "" } else { &self.uri[1..] }
    }

    /// Get the relative reference from a base URI to this PackURI.
    ///
    /// For example, PackURI("/xl/styles.xml") would return "../styles.xml"
    /// for base_uri "/xl/worksheets". This is the form stored in the Target
    /// attribute of a .rels entry.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        // Special case for root base URI
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        // Find common prefix length
        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = String::new();

        // Climb out of the remaining base directories
        for _ in common..from_parts.len() {
            result.push_str("../");
        }

        // Descend into the target
        for (i, part) in to_parts.iter().enumerate().skip(common) {
            if i > common {
                result.push('/');
            }
            result.push_str(part);
        }

        result
    }

    /// Get the PackURI of the .rels part corresponding to this PackURI.
    ///
    /// For example, "/xl/_rels/workbook.xml.rels" for "/xl/workbook.xml",
    /// and "/_rels/.rels" for the package pseudo-partname "/".
    pub fn rels_uri(&self) -> PackURI {
        let base_uri = self.base_uri();
        let uri = if base_uri == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base_uri, self.filename())
        };
        // Built from canonical components, so itself canonical
        PackURI { uri }
    }

    /// Get the PackURI of the part that owns this .rels part, or None if this
    /// is not a .rels partname.
    ///
    /// The inverse of [`rels_uri`](Self::rels_uri): "/xl/_rels/workbook.xml.rels"
    /// yields "/xl/workbook.xml", and "/_rels/.rels" yields the package
    /// pseudo-partname "/".
    pub fn rels_owner(&self) -> Option<PackURI> {
        let stem = self.filename().strip_suffix(".rels")?;

        let rels_dir = self.base_uri();
        let parent_dir = rels_dir.strip_suffix("_rels")?;
        // The containing directory must literally be named "_rels"
        if parent_dir != "/" && !parent_dir.ends_with('/') {
            return None;
        }
        let parent_dir = parent_dir.trim_end_matches('/');

        if stem.is_empty() {
            return if parent_dir.is_empty() {
                Some(PackURI {
                    uri: "/".to_string(),
                })
            } else {
                // Only the package root carries a ".rels" with an empty stem
                None
            };
        }

        Some(PackURI {
            uri: format!("{}/{}", parent_dir, stem),
        })
    }

    /// Get the full URI string in canonical form.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/xl/workbook.xml").is_ok());
        assert!(PackURI::new("xl/workbook.xml").is_err());
        assert!(PackURI::new("/xl\\workbook.xml").is_err());
    }

    #[test]
    fn test_normalization() {
        assert_eq!(PackURI::new("/xl//workbook.xml").unwrap().as_str(), "/xl/workbook.xml");
        assert_eq!(PackURI::new("/xl/./workbook.xml").unwrap().as_str(), "/xl/workbook.xml");
        assert_eq!(
            PackURI::new("/xl/worksheets/../workbook.xml").unwrap().as_str(),
            "/xl/workbook.xml"
        );
        assert_eq!(PackURI::new("/xl/").unwrap().as_str(), "/xl");
        assert_eq!(PackURI::new("/").unwrap().as_str(), "/");
    }

    #[test]
    fn test_root_escape_fails() {
        assert!(PackURI::new("/../evil.xml").is_err());
        assert!(PackURI::new("/xl/../../evil.xml").is_err());
        assert!(PackURI::from_rel_ref("/xl", "../../evil.xml").is_err());
    }

    #[test]
    fn test_from_rel_ref() {
        let uri = PackURI::from_rel_ref("/xl/worksheets", "../styles.xml").unwrap();
        assert_eq!(uri.as_str(), "/xl/styles.xml");

        let uri = PackURI::from_rel_ref("/", "xl/workbook.xml").unwrap();
        assert_eq!(uri.as_str(), "/xl/workbook.xml");

        // Absolute references replace the base entirely
        let uri = PackURI::from_rel_ref("/xl", "/docProps/core.xml").unwrap();
        assert_eq!(uri.as_str(), "/docProps/core.xml");
    }

    #[test]
    fn test_join() {
        let uri = PackURI::new("/xl").unwrap();
        assert_eq!(uri.join("workbook.xml").unwrap().as_str(), "/xl/workbook.xml");
        assert_eq!(uri.join("/docProps/app.xml").unwrap().as_str(), "/docProps/app.xml");
    }

    #[test]
    fn test_parent() {
        let uri = PackURI::new("/xl/worksheets/sheet1.xml").unwrap();
        assert_eq!(uri.parent().unwrap().as_str(), "/xl/worksheets");
        assert_eq!(PackURI::new("/xl").unwrap().parent().unwrap().as_str(), "/");
        assert!(PackURI::new("/").unwrap().parent().is_none());
    }

    #[test]
    fn test_base_uri() {
        let uri = PackURI::new("/xl/worksheets/sheet1.xml").unwrap();
        assert_eq!(uri.base_uri(), "/xl/worksheets");

        let root = PackURI::new("/").unwrap();
        assert_eq!(root.base_uri(), "/");
    }

    #[test]
    fn test_filename() {
        let uri = PackURI::new("/xl/worksheets/sheet1.xml").unwrap();
        assert_eq!(uri.filename(), "sheet1.xml");

        let root = PackURI::new("/").unwrap();
        assert_eq!(root.filename(), "");
    }

    #[test]
    fn test_ext() {
        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(uri.ext(), "xml");
    }

    #[test]
    fn test_idx() {
        let uri = PackURI::new("/xl/worksheets/sheet21.xml").unwrap();
        assert_eq!(uri.idx(), Some(21));

        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(uri.idx(), None);
    }

    #[test]
    fn test_membername() {
        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(uri.membername(), "xl/workbook.xml");

        let root = PackURI::new("/").unwrap();
        assert_eq!(root.membername(), "");
    }

    #[test]
    fn test_relative_ref() {
        let uri = PackURI::new("/a/b").unwrap();
        assert_eq!(uri.relative_ref("/a/c"), "../b");

        let uri = PackURI::new("/xl/styles.xml").unwrap();
        assert_eq!(uri.relative_ref("/xl/worksheets"), "../styles.xml");

        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(uri.relative_ref("/"), "xl/workbook.xml");
        assert_eq!(uri.relative_ref("/xl"), "workbook.xml");
    }

    #[test]
    fn test_rel_ref_round_trip() {
        let target = PackURI::new("/xl/styles.xml").unwrap();
        let base = "/xl/worksheets";
        let rel = target.relative_ref(base);
        assert_eq!(PackURI::from_rel_ref(base, &rel).unwrap(), target);
    }

    #[test]
    fn test_rels_uri() {
        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(uri.rels_uri().as_str(), "/xl/_rels/workbook.xml.rels");

        let root = PackURI::new("/").unwrap();
        assert_eq!(root.rels_uri().as_str(), "/_rels/.rels");
    }

    #[test]
    fn test_rels_owner() {
        let rels = PackURI::new("/xl/_rels/workbook.xml.rels").unwrap();
        assert_eq!(rels.rels_owner().unwrap().as_str(), "/xl/workbook.xml");

        let root_rels = PackURI::new("/_rels/.rels").unwrap();
        assert_eq!(root_rels.rels_owner().unwrap().as_str(), "/");

        // Not a .rels partname
        assert!(PackURI::new("/xl/workbook.xml").unwrap().rels_owner().is_none());
        // .rels extension outside a _rels directory
        assert!(PackURI::new("/xl/workbook.xml.rels").unwrap().rels_owner().is_none());
    }

    #[test]
    fn test_rels_round_trip() {
        for partname in ["/xl/workbook.xml", "/xl/worksheets/sheet1.xml", "/"] {
            let uri = PackURI::new(partname).unwrap();
            assert_eq!(uri.rels_uri().rels_owner().unwrap(), uri);
        }
    }

    fn segment_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => "[A-Za-z][A-Za-z0-9_-]{0,6}",
            2 => "[A-Za-z][A-Za-z0-9]{0,4}\\.xml",
            1 => Just(".".to_string()),
            1 => Just("..".to_string()),
        ]
    }

    proptest! {
        // Canonical form is a fixed point: parse(to_string(parse(s))) == parse(s)
        #[test]
        fn canonical_form_round_trips(segments in prop::collection::vec(segment_strategy(), 0..6)) {
            let raw = format!("/{}", segments.join("/"));
            prop_assume!(PackURI::new(&raw).is_ok());
            let parsed = PackURI::new(&raw).unwrap();
            let reparsed = PackURI::new(parsed.to_string()).unwrap();
            prop_assert_eq!(parsed, reparsed);
        }
    }
}
