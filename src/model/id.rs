//! Content-addressed object id using SHA-1

use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// Length of a raw object id in bytes
pub const ID_LEN: usize = 20;

/// Length of an object id rendered as hex
pub const HEX_LEN: usize = ID_LEN * 2;

/// A 20-byte SHA-1 digest used for content addressing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Create an id from raw bytes
    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        ObjectId(bytes)
    }

    /// Hash arbitrary data
    pub fn digest(data: &[u8]) -> Self {
        let digest = Sha1::digest(data);
        let mut arr = [0u8; ID_LEN];
        arr.copy_from_slice(&digest);
        ObjectId(arr)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Convert to a 40-character lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 40-character hex string
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        if s.len() != HEX_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(ObjectId(arr))
    }

    /// Get a short prefix for display (first 7 chars, like git)
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// Name of the shard directory holding this object
    pub fn shard(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// File name of this object within its shard
    pub fn remainder(&self) -> String {
        hex::encode(&self.0[1..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short())
    }
}

impl FromStr for ObjectId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::from_hex(s)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_matches_sha1() {
        let id = ObjectId::digest(b"blob 12\0hello world\n");
        assert_eq!(id.to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
    }

    #[test]
    fn test_digest_deterministic() {
        let a = ObjectId::digest(b"hello");
        let b = ObjectId::digest(b"hello");
        let c = ObjectId::digest(b"world");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hex_roundtrip() {
        let id = ObjectId::digest(b"test data");
        let parsed: ObjectId = id.to_hex().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(parsed.as_bytes(), id.as_bytes());
    }

    #[test]
    fn test_from_hex_normalizes_case() {
        let upper = "3B18E512DBA79E4C8300DD08AEB37F8E728B8DAD";
        let id = ObjectId::from_hex(upper).unwrap();
        assert_eq!(id.to_hex(), upper.to_lowercase());
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(ObjectId::from_hex("3b18e5").is_err());
        assert!(ObjectId::from_hex("").is_err());
        assert!(ObjectId::from_hex("zz18e512dba79e4c8300dd08aeb37f8e728b8dad").is_err());
        assert!(ObjectId::from_hex("3b18e512dba79e4c8300dd08aeb37f8e728b8dad00").is_err());
    }

    #[test]
    fn test_shard_and_remainder() {
        let id = ObjectId::from_hex("3b18e512dba79e4c8300dd08aeb37f8e728b8dad").unwrap();
        assert_eq!(id.shard(), "3b");
        assert_eq!(id.remainder(), "18e512dba79e4c8300dd08aeb37f8e728b8dad");
        assert_eq!(id.remainder().len(), 38);
        assert_eq!(id.short(), "3b18e51");
    }
}
