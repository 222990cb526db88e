use crate::stored_identity::StoredIdentity;

/// Result of reading the identity file - distinguishes "not found" from errors.
#[derive(Debug)]
pub struct LoadResult {
    pub identity: Option<StoredIdentity>,
    /// Present if the file exists but could not be parsed
    pub corruption_error: Option<String>,
}
