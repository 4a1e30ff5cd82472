//! High-level Repository API
//!
//! Ties a repository root to its object store. The root is always passed in
//! explicitly; nothing here consults the process working directory.

use crate::config::Config;
use crate::model::{ObjectId, ObjectKind};
use crate::store::{parse_id, FramedObject, Object, ObjectStore};
use crate::{Error, Result, HEAD_FILE, OBJECTS_DIR, REFS_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What `init` found at the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fresh repository was laid out
    Created,
    /// The layout already existed; missing pieces were filled in
    Reinitialized,
}

/// A repository: a root directory holding `objects/`, `refs/` and `HEAD`
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    store: ObjectStore,
}

impl Repository {
    /// Lay out a repository at `root`
    ///
    /// Existing directories are kept, and an existing HEAD is never
    /// overwritten.
    pub fn init(root: impl AsRef<Path>, config: &Config) -> Result<InitOutcome> {
        let root = root.as_ref();
        let head = root.join(HEAD_FILE);
        let outcome = if head.exists() {
            InitOutcome::Reinitialized
        } else {
            InitOutcome::Created
        };

        for dir in [
            root.to_path_buf(),
            root.join(OBJECTS_DIR),
            root.join(REFS_DIR),
            root.join(REFS_DIR).join("heads"),
        ] {
            fs::create_dir_all(&dir).map_err(|e| Error::storage(&dir, e))?;
        }

        if outcome == InitOutcome::Created {
            let contents = format!("ref: refs/heads/{}\n", config.default_branch);
            fs::write(&head, contents).map_err(|e| Error::storage(&head, e))?;
        }

        debug!(root = %root.display(), ?outcome, "initialized repository");
        Ok(outcome)
    }

    /// Open an existing repository
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let objects = root.join(OBJECTS_DIR);
        if !objects.is_dir() {
            return Err(Error::NotARepository(root));
        }

        Ok(Repository {
            store: ObjectStore::new(objects),
            root,
        })
    }

    /// Initialize if needed, then open
    pub fn init_or_open(root: impl AsRef<Path>, config: &Config) -> Result<Self> {
        Self::init(&root, config)?;
        Self::open(root)
    }

    /// Get the repository root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the underlying object store
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    // === Object Operations ===

    /// Compute the id of a payload, storing it when `write` is set
    pub fn hash_object(&self, kind: ObjectKind, payload: &[u8], write: bool) -> Result<ObjectId> {
        let object = FramedObject::new(kind, payload);
        if write {
            self.store.put_object(&object)
        } else {
            Ok(object.id())
        }
    }

    /// Read an object by hex id, keeping its kind
    pub fn read_object(&self, id: &str) -> Result<Object> {
        let id = parse_id(id)?;
        self.store.read(&id)
    }

    /// Read an object's payload by hex id
    pub fn cat_file(&self, id: &str) -> Result<Vec<u8>> {
        self.store.get(id)
    }

    /// Check whether a hex id names a stored object
    pub fn has_object(&self, id: &str) -> bool {
        parse_id(id).map(|id| self.store.contains(&id)).unwrap_or(false)
    }
}
