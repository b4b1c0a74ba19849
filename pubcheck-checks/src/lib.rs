//! The pubcheck check suite.
//!
//! Every check implements [`pubcheck_engine::Check`] over its own item type:
//! binaries for the native-dependency resolver, manifest dependency groups
//! for the duplicate detector, package files for the metadata and
//! duplicate-file checks. Checks own their run-scoped bookkeeping
//! (resolution caches, candidate maps) as instance fields; nothing is shared
//! across checks or packages.

mod deps_solver;
mod description;
mod duplicate_deps;
mod duplicate_files;
mod executable;
mod files;
mod ports;
mod version;

pub use deps_solver::{DepsSolverCheck, Resolution};
pub use description::DescriptionCheck;
pub use duplicate_deps::{DuplicateDepsCheck, DuplicateGroup};
pub use duplicate_files::DuplicateFilesCheck;
pub use executable::ExecutableCheck;
pub use ports::{BinaryInspector, ElfInspector, SearchProvider};
pub use version::VersionCheck;
