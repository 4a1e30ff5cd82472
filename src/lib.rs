//! # mygit
//!
//! A content-addressed object store using git's loose object format.
//!
//! Payloads are framed as `<kind> <len>\0<payload>`, identified by the SHA-1
//! of that frame, and stored zlib-compressed under
//! `<root>/objects/<2 hex>/<38 hex>`. Files written here can be read by git
//! itself, and vice versa for blobs.
//!
//! ## Core Concepts
//!
//! - **Objects**: immutable payloads tagged with a kind (only `blob` today)
//! - **Ids**: SHA-1 of the framed object, 40 lowercase hex characters
//! - **Repository**: an explicit root directory; no implicit working directory
//!
//! ## Example
//!
//! ```ignore
//! use mygit::{Config, ObjectKind, Repository};
//!
//! let repo = Repository::init_or_open(".git", &Config::default())?;
//! let id = repo.hash_object(ObjectKind::Blob, b"hello world\n", true)?;
//! assert_eq!(repo.cat_file(&id.to_hex())?, b"hello world\n");
//! ```

pub mod config;
pub mod model;
pub mod store;

mod error;
mod repository;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{ObjectId, ObjectKind};
pub use repository::{InitOutcome, Repository};
pub use store::{FramedObject, Object, ObjectStore};

/// Directory holding the object shards, relative to the repository root
pub const OBJECTS_DIR: &str = "objects";

/// Directory holding refs, relative to the repository root
pub const REFS_DIR: &str = "refs";

/// Symbolic pointer file written at init
pub const HEAD_FILE: &str = "HEAD";
