/// Constant values related to the Open Packaging Convention and SpreadsheetML.
///
/// This module contains content type URIs (like MIME-types) that specify a part's
/// format, XML namespaces and the namespace registry, relationship types,
/// well-known part locations, and the numeric safety limits applied to values
/// read from untrusted files.
use crate::error::{OpcError, Result};

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // Image content types
    pub const BMP: &str = "image/bmp";
    pub const GIF: &str = "image/gif";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
    pub const TIFF: &str = "image/tiff";
    pub const X_EMF: &str = "image/x-emf";
    pub const X_WMF: &str = "image/x-wmf";

    // OPC core content types
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

    // Office common content types
    pub const OFC_EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
    pub const OFC_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

    // SpreadsheetML content types
    pub const SML_SHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    pub const SML_SHEET_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const SML_WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
    pub const SML_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
    pub const SML_SHARED_STRINGS: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";

    // Generic XML
    pub const XML: &str = "application/xml";
}

/// XML namespace URIs used in SpreadsheetML packages
pub mod namespace {
    use super::{OpcError, Result};

    /// SpreadsheetML main namespace
    pub const SML_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

    /// Office relationships namespace (the `r:` prefix inside part bodies)
    pub const OFC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// OPC relationships namespace (the vocabulary of .rels parts)
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// OPC content types namespace
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";

    /// DrawingML main namespace (themes live in this vocabulary)
    pub const DML_MAIN: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// Registered namespace prefixes.
    ///
    /// Initialized at compile time; there is no runtime mutation path.
    static NAMESPACES: phf::Map<&'static str, &'static str> = phf::phf_map! {
        "spreadsheetml" => SML_MAIN,
        "content-types" => OPC_CONTENT_TYPES,
        "relationships" => OPC_RELATIONSHIPS,
        "r" => OFC_RELATIONSHIPS,
        "drawingml" => DML_MAIN,
        "theme" => DML_MAIN,
        "core-properties" => "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
        "extended-properties" => "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        "dc" => "http://purl.org/dc/elements/1.1/",
        "dcterms" => "http://purl.org/dc/terms/",
        "dcmitype" => "http://purl.org/dc/dcmitype/",
        "xsi" => "http://www.w3.org/2001/XMLSchema-instance",
        "vt" => "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
        "mc" => "http://schemas.openxmlformats.org/markup-compatibility/2006",
        "x14ac" => "http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac",
        "xml" => "http://www.w3.org/XML/1998/namespace",
    };

    /// Look up a namespace URI by its registered prefix.
    ///
    /// An unregistered prefix is a hard error; silently substituting an empty
    /// namespace would corrupt generated XML.
    pub fn ns(id: &str) -> Result<&'static str> {
        NAMESPACES
            .get(id)
            .copied()
            .ok_or_else(|| OpcError::NamespaceNotFound(id.to_string()))
    }
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., hyperlinks to external URLs)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in SpreadsheetML packages
pub mod relationship_type {
    // Package-level relationships
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const THUMBNAIL: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/thumbnail";

    /// Points from the package root to the workbook part
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    // Workbook-level relationships
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

    // Worksheet-level relationships
    pub const DRAWING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}

/// Canonical partnames of the fixed, well-known package parts
pub mod part {
    pub const CONTENT_TYPES: &str = "/[Content_Types].xml";
    pub const ROOT_RELATIONSHIPS: &str = "/_rels/.rels";
    pub const WORKBOOK: &str = "/xl/workbook.xml";
    pub const STYLES: &str = "/xl/styles.xml";
    pub const THEME: &str = "/xl/theme/theme1.xml";
    pub const SHARED_STRINGS: &str = "/xl/sharedStrings.xml";
    pub const CORE_PROPERTIES: &str = "/docProps/core.xml";
    pub const APP_PROPERTIES: &str = "/docProps/app.xml";
}

/// Directories that conventionally contain package parts
pub mod dir {
    pub const ROOT_RELS: &str = "/_rels";
    pub const PROPERTIES: &str = "/docProps";
    pub const XL: &str = "/xl";
    pub const THEME: &str = "/xl/theme";
    pub const WORKSHEETS: &str = "/xl/worksheets";
    pub const DRAWINGS: &str = "/xl/drawings";
}

/// Numeric safety bounds applied to values read from untrusted files
pub mod limits {
    /// The lowest allowable row index in a worksheet
    pub const MIN_ROW: u32 = 1;

    /// The largest allowable row index in a worksheet
    pub const MAX_ROW: u32 = 1_048_576;

    /// The lowest allowable column index in a worksheet
    pub const MIN_COLUMN: u32 = 1;

    /// The largest allowable column index in a worksheet
    pub const MAX_COLUMN: u32 = 16_384;

    /// The maximum element count any container pre-allocation may request.
    ///
    /// Counts declared in package XML (or the archive's own entry count) feed
    /// `reserve`-style pre-allocation for performance; a crafted file can
    /// declare an arbitrary count, so the declared value is never trusted
    /// beyond this ceiling. Actual elements past the ceiling still load —
    /// the container just grows normally from there.
    pub const MAX_ELEMENTS_FOR_RESERVE: usize = 1024 * 1024;

    /// Clamp an untrusted count to [`MAX_ELEMENTS_FOR_RESERVE`] before using
    /// it in a pre-allocation.
    #[inline]
    pub fn clamp_reserve(count: usize) -> usize {
        count.min(MAX_ELEMENTS_FOR_RESERVE)
    }

    /// Whether a 1-based row index lies within the worksheet bounds.
    #[inline]
    pub fn is_valid_row(row: u32) -> bool {
        (MIN_ROW..=MAX_ROW).contains(&row)
    }

    /// Whether a 1-based column index lies within the worksheet bounds.
    #[inline]
    pub fn is_valid_column(column: u32) -> bool {
        (MIN_COLUMN..=MAX_COLUMN).contains(&column)
    }
}
