/// Open Packaging Convention (OPC) objects related to package parts.
///
/// A part is a single named entry inside the package, addressed by its
/// partname. The payload is opaque bytes to this crate — parsing part bodies
/// belongs to the document-model layer — and may be unmaterialized after a
/// load: large archives are not decompressed wholesale, each body is read on
/// first access and cached for the lifetime of the package. The cell gives a
/// compute-once guarantee, so concurrent readers racing to materialize the
/// same part observe a single decompression.
///
/// A part's content type is not stored here; the package's content-type
/// registry is the single authority for that mapping.
use crate::packuri::PackURI;
use once_cell::sync::OnceCell;

#[derive(Debug)]
pub struct Part {
    /// The partname (URI) of this part
    partname: PackURI,

    /// The payload; empty until materialized for lazily loaded parts
    blob: OnceCell<Vec<u8>>,
}

impl Part {
    /// Create a part with its payload already in memory.
    pub fn new(partname: PackURI, blob: Vec<u8>) -> Self {
        let cell = OnceCell::new();
        // A fresh cell accepts exactly one set
        let _ = cell.set(blob);
        Self {
            partname,
            blob: cell,
        }
    }

    /// Create a part whose payload will be materialized on first access.
    pub fn new_lazy(partname: PackURI) -> Self {
        Self {
            partname,
            blob: OnceCell::new(),
        }
    }

    /// Get the partname of this part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the payload if it has been materialized.
    #[inline]
    pub fn blob(&self) -> Option<&[u8]> {
        self.blob.get().map(Vec::as_slice)
    }

    /// Whether the payload has been materialized.
    #[inline]
    pub fn is_materialized(&self) -> bool {
        self.blob.get().is_some()
    }

    /// Get the payload, materializing it with `read` on first access.
    ///
    /// `read` runs at most once for the lifetime of this part, even under
    /// concurrent first access from multiple threads.
    pub fn blob_or_init<E>(
        &self,
        read: impl FnOnce() -> std::result::Result<Vec<u8>, E>,
    ) -> std::result::Result<&[u8], E> {
        self.blob.get_or_try_init(read).map(Vec::as_slice)
    }

    /// Replace the payload, discarding any cached bytes.
    pub fn set_blob(&mut self, blob: Vec<u8>) {
        let cell = OnceCell::new();
        let _ = cell.set(blob);
        self.blob = cell;
    }
}
