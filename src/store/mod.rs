//! Content-addressed object store
//!
//! Objects are framed as `<kind> <len>\0<payload>`, addressed by the SHA-1 of
//! that frame and stored zlib-compressed in a directory sharded by id prefix.

pub mod frame;
mod loose;

pub use frame::{FramedObject, Object};
pub use loose::ObjectStore;
pub(crate) use loose::parse_id;
