//! Loose object store: one zlib-compressed file per object
//!
//! Layout:
//! ```text
//! <objects>/<2 hex chars>/<38 hex chars>
//! ```
//!
//! Writes go to a temporary file inside the shard directory and are then
//! linked into place, so readers never see a half-written object. Published
//! objects are read-only (0444 on unix), like git's.

use crate::model::ObjectId;
use crate::store::frame::{self, FramedObject, Object};
use crate::{Error, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// Mode of a published object file
#[cfg(unix)]
const OBJECT_MODE: u32 = 0o444;

/// A content-addressed object store backed by a sharded directory
#[derive(Clone, Debug)]
pub struct ObjectStore {
    /// Path to the objects directory
    objects_dir: PathBuf,
}

impl ObjectStore {
    /// Create a store rooted at an existing or future objects directory
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        ObjectStore {
            objects_dir: objects_dir.into(),
        }
    }

    /// Get the objects directory
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Where the object with this id lives on disk
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.objects_dir.join(id.shard()).join(id.remainder())
    }

    /// Check if an object exists
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Store a framed object, returns its id
    pub fn put_object(&self, object: &FramedObject) -> Result<ObjectId> {
        self.put(object.frame(), &object.id())
    }

    /// Store frame bytes under `id`, returns the id
    ///
    /// The caller vouches that `id` is the hash of `frame`. Storing an id
    /// that is already present is a no-op.
    pub fn put(&self, frame: &[u8], id: &ObjectId) -> Result<ObjectId> {
        let path = self.object_path(id);
        if path.exists() {
            trace!(id = %id, "object already stored");
            return Ok(*id);
        }

        let shard_dir = self.objects_dir.join(id.shard());
        fs::create_dir_all(&shard_dir).map_err(|e| Error::storage(&shard_dir, e))?;

        let tmp = NamedTempFile::new_in(&shard_dir).map_err(|e| Error::storage(&shard_dir, e))?;
        let mut encoder = ZlibEncoder::new(tmp, Compression::default());
        encoder
            .write_all(frame)
            .map_err(|e| Error::storage(&path, e))?;
        let tmp = encoder.finish().map_err(|e| Error::storage(&path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::storage(&path, e))?;
        set_read_only(tmp.as_file()).map_err(|e| Error::storage(&path, e))?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                debug!(id = %id, size = frame.len(), "stored object");
            }
            // Another writer published the same content first
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                trace!(id = %id, "lost publish race; object already stored");
            }
            Err(e) => return Err(Error::storage(&path, e.error)),
        }

        Ok(*id)
    }

    /// Retrieve an object's payload by its hex id
    pub fn get(&self, id: &str) -> Result<Vec<u8>> {
        let id = parse_id(id)?;
        Ok(self.read(&id)?.payload)
    }

    /// Retrieve and decode an object
    pub fn read(&self, id: &ObjectId) -> Result<Object> {
        let frame = self.read_raw(id)?;
        let object = frame::unframe(&frame)?;
        debug!(id = %id, kind = %object.kind, size = object.size(), "read object");
        Ok(object)
    }

    /// Retrieve the decompressed frame of an object
    pub fn read_raw(&self, id: &ObjectId) -> Result<Vec<u8>> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            // A missing root is a storage problem, not a missing object
            Err(e) if e.kind() == io::ErrorKind::NotFound && !self.objects_dir.is_dir() => {
                return Err(Error::storage(&self.objects_dir, e));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(id.to_hex()));
            }
            Err(e) => return Err(Error::storage(&path, e)),
        };

        let mut frame = Vec::new();
        let mut decoder = ZlibDecoder::new(compressed.as_slice());
        decoder
            .read_to_end(&mut frame)
            .map_err(|e| Error::CorruptObject(format!("{}: {}", id, e)))?;

        if decoder.total_in() != compressed.len() as u64 {
            return Err(Error::CorruptObject(format!(
                "{}: garbage at end of loose object",
                id
            )));
        }
        Ok(frame)
    }
}

#[cfg(unix)]
fn set_read_only(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(OBJECT_MODE))
}

#[cfg(not(unix))]
fn set_read_only(file: &fs::File) -> io::Result<()> {
    let mut perms = file.metadata()?.permissions();
    perms.set_readonly(true);
    file.set_permissions(perms)
}

/// Parse a full-length hex id; anything else can't name a stored object
pub(crate) fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::from_hex(id).map_err(|_| Error::ObjectNotFound(id.to_string()))
}
