//! Object kind tag

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag written into every object header
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// An opaque byte payload
    Blob,
}

impl ObjectKind {
    /// The ASCII name used in the frame header
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
        }
    }

    /// Look up a kind by its raw header bytes
    pub(crate) fn from_header(tag: &[u8]) -> Option<Self> {
        match tag {
            b"blob" => Some(ObjectKind::Blob),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_header(s.as_bytes()).ok_or_else(|| Error::InvalidKind(s.to_string()))
    }
}
