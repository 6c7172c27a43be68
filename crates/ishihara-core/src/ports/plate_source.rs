//! Plate source port for listing and reading plate images.

/// Port for a directory-like store of plate images.
pub trait PlateSource: Send + Sync {
    /// Returns the names of all entries in the store.
    ///
    /// Names are bare filenames, not paths. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    fn names(&self) -> anyhow::Result<Vec<String>>;

    /// Reads the raw bytes of the named entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or cannot be read.
    fn read(&self, name: &str) -> anyhow::Result<Vec<u8>>;
}
