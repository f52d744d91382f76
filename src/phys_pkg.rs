//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module is the boundary between the logical package model and the
//! archive codec: everything above it deals in partnames and byte payloads,
//! everything below is the `zip` crate. Reading is on-demand — an entry is
//! decompressed only when asked for — which is what makes lazy part
//! materialization in the package possible.

use crate::constants::limits;
use crate::error::{OpcError, Result};
use crate::packuri::PackURI;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Physical package reader that provides access to parts in a ZIP-based OPC package.
///
/// Owns the archive bytes; entries are decompressed individually on request.
pub struct PhysPkgReader {
    /// The underlying ZIP archive
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl PhysPkgReader {
    /// Open an OPC package from a file path.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or isn't a valid ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Create a new PhysPkgReader from owned archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| OpcError::MalformedPackage(format!("not a ZIP archive: {}", e)))?;
        Ok(Self { archive })
    }

    /// Create a new PhysPkgReader from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Get the number of entries in the package.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the package is empty.
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// List all member names in the package.
    pub fn member_names(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }

    /// Check if a specific member exists in the package.
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        let membername = pack_uri.membername();
        self.archive.file_names().any(|name| name == membername)
    }

    /// Get the binary content for a part by its PackURI.
    ///
    /// Decompresses the entry on each call; callers that want caching hold
    /// the result (the package's part cells do exactly that). The entry's
    /// declared size only seeds the read buffer after clamping — a crafted
    /// header cannot force an oversized allocation.
    pub fn blob_for(&mut self, pack_uri: &PackURI) -> Result<Vec<u8>> {
        let mut entry = match self.archive.by_name(pack_uri.membername()) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(OpcError::PartNotFound(pack_uri.to_string()));
            },
            Err(e) => return Err(e.into()),
        };

        let mut blob = Vec::with_capacity(limits::clamp_reserve(entry.size() as usize));
        entry.read_to_end(&mut blob)?;
        Ok(blob)
    }

    /// Get the [Content_Types].xml content.
    ///
    /// This is a required part of every OPC package that maps parts to content types.
    pub fn content_types_xml(&mut self) -> Result<Vec<u8>> {
        let uri = PackURI::new(crate::packuri::CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        self.blob_for(&uri)
    }

    /// Get the relationships XML for a specific source URI.
    ///
    /// Relationships parts live in _rels directories with a .rels extension.
    /// Returns None if the source has no relationships part — a part with no
    /// relationships simply has nothing stored for it.
    pub fn rels_xml_for(&mut self, source_uri: &PackURI) -> Result<Option<Vec<u8>>> {
        let rels_uri = source_uri.rels_uri();

        match self.blob_for(&rels_uri) {
            Ok(blob) => Ok(Some(blob)),
            Err(OpcError::PartNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Physical package writer for creating OPC packages.
///
/// Handles the low-level writing of parts to an in-memory ZIP archive with
/// Deflate compression.
pub struct PhysPkgWriter {
    /// The underlying ZIP archive writer
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a part to the package.
    ///
    /// # Arguments
    /// * `pack_uri` - The PackURI for the part
    /// * `blob` - The binary content to write
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive
            .start_file(pack_uri.membername(), SimpleFileOptions::default())?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    ///
    /// Consumes the writer and returns the complete ZIP archive.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
