//! Reader configuration.

/// Options controlling how a [`crate::Handle`] navigates its underlying
/// byte source.
///
/// Mirrors the parser-options pattern used elsewhere in this crate's
/// lineage: a small `Copy` struct with a `Default` impl, threaded through
/// every entry point that creates a handle.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Whether containers memoise the byte offsets of children they walk
    /// past, so that later random access (`at`/`get`/`has`) on an index or
    /// key already scanned can seek directly to it instead of re-scanning
    /// from the start.
    ///
    /// Disabling this trades away that acceleration for a smaller memory
    /// footprint when a container is only ever walked once, forward, via
    /// [`crate::ArrayHandle::iter`] or [`crate::ObjectHandle::iter`].
    pub use_cache: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}
