use std::fmt;

/// A 32-byte Blake3 hash addressing one field of one stored object.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key([u8; 32]);

impl Key {
    /// Computes the key for `field` of the object identified by `object_id`.
    ///
    /// Both parts are length-prefixed, so `("ab", "c")` and `("a", "bc")`
    /// address different slots.
    pub fn for_field(object_id: &str, field: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(object_id.len() as u64).to_le_bytes());
        hasher.update(object_id.as_bytes());
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
        Key(*hasher.finalize().as_bytes())
    }

    /// Creates a key from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Key(bytes)
    }

    /// Returns the key as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
