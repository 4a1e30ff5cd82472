//! Object framing - the canonical byte layout that gets hashed and stored
//!
//! Frame format:
//! ```text
//! <kind> SP <decimal length> NUL <payload>
//! ```
//!
//! The id of an object is the SHA-1 of its whole frame, so two payloads of
//! different kinds never share an id.

use crate::model::{ObjectId, ObjectKind};
use crate::{Error, Result};

/// A decoded object: its kind and raw payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    /// Kind declared in the header
    pub kind: ObjectKind,
    /// Raw payload bytes
    pub payload: Vec<u8>,
}

impl Object {
    /// Create a new object
    pub fn new(kind: ObjectKind, payload: impl Into<Vec<u8>>) -> Self {
        Object {
            kind,
            payload: payload.into(),
        }
    }

    /// Create a blob object
    pub fn blob(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(ObjectKind::Blob, payload)
    }

    /// Frame and hash this object
    pub fn to_framed(&self) -> FramedObject {
        FramedObject::new(self.kind, &self.payload)
    }

    /// Size of the payload in bytes
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// An object that has been framed and hashed in one step
#[derive(Clone, Debug)]
pub struct FramedObject {
    kind: ObjectKind,
    frame: Vec<u8>,
    header_len: usize,
    id: ObjectId,
}

impl FramedObject {
    /// Frame `payload` under `kind` and compute its id
    pub fn new(kind: ObjectKind, payload: &[u8]) -> Self {
        let frame = frame(kind, payload);
        let header_len = frame.len() - payload.len();
        let id = hash(&frame);
        FramedObject {
            kind,
            frame,
            header_len,
            id,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The full canonical frame
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// The payload portion of the frame
    pub fn payload(&self) -> &[u8] {
        &self.frame[self.header_len..]
    }

    pub fn size(&self) -> usize {
        self.frame.len() - self.header_len
    }
}

/// Build the canonical frame for a payload
pub fn frame(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let tag = kind.as_str().as_bytes();
    let len = payload.len().to_string();

    let mut buf = Vec::with_capacity(tag.len() + 1 + len.len() + 1 + payload.len());
    buf.extend_from_slice(tag);
    buf.push(b' ');
    buf.extend_from_slice(len.as_bytes());
    buf.push(0);
    buf.extend_from_slice(payload);
    buf
}

/// Build a frame from a textual kind tag
pub fn frame_tagged(tag: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let kind: ObjectKind = tag.parse()?;
    Ok(frame(kind, payload))
}

/// Compute the id of a frame
pub fn hash(frame: &[u8]) -> ObjectId {
    ObjectId::digest(frame)
}

/// Split a frame back into its kind and payload
pub fn unframe(frame: &[u8]) -> Result<Object> {
    let nul = frame
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::CorruptObject("missing header terminator".into()))?;
    let header = &frame[..nul];
    let payload = &frame[nul + 1..];

    let space = header
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| Error::CorruptObject("header has no length field".into()))?;
    let (tag, len_token) = (&header[..space], &header[space + 1..]);

    if tag.is_empty() {
        return Err(Error::CorruptObject("header has an empty kind".into()));
    }
    let kind = ObjectKind::from_header(tag).ok_or_else(|| {
        Error::CorruptObject(format!(
            "unknown object kind '{}'",
            String::from_utf8_lossy(tag)
        ))
    })?;

    let declared = parse_length(len_token)?;
    if declared != payload.len() as u64 {
        return Err(Error::CorruptObject(format!(
            "declared length {} but found {} bytes",
            declared,
            payload.len()
        )));
    }

    Ok(Object::new(kind, payload))
}

/// Parse a canonical decimal length: digits only, no sign, no leading zeros
fn parse_length(token: &[u8]) -> Result<u64> {
    let invalid = || {
        Error::CorruptObject(format!(
            "invalid length '{}'",
            String::from_utf8_lossy(token)
        ))
    };

    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    if token.len() > 1 && token[0] == b'0' {
        return Err(invalid());
    }

    token.iter().try_fold(0u64, |acc, &d| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(d - b'0')))
            .ok_or_else(invalid)
    })
}
