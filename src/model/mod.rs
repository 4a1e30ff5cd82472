//! Core data model types for mygit

mod id;
mod kind;

pub use id::{ObjectId, HEX_LEN, ID_LEN};
pub use kind::ObjectKind;
