//! Shared data model for the pubcheck workspace.
//!
//! # Design constraints
//! - `DepKey` is the canonical form of a manifest dependency key; the string
//!   encoding `"repo::package"` only exists at the manifest boundary.
//! - `Candidate` mirrors the repository search API response and is
//!   deserialized straight from the wire.

mod dep;
mod repository;
mod search;

pub use dep::{DepKey, DepKeyError};
pub use repository::Repository;
pub use search::Candidate;
