//! Module artifact package format.
//!
//! A module artifact is a zip archive whose `META-INF/MANIFEST.MF` entry
//! declares the module identity as `Key: Value` headers:
//! - `Module-SymbolicName` — the name shared by all versions of a module
//! - `Module-Version` — a `major.minor.micro.qualifier` version
//!
//! Opening an artifact extracts and validates these attributes; both are
//! mandatory and each missing one is reported individually.

mod error;
mod manifest;
mod package;
mod version;

pub use error::PackError;
pub use manifest::{ModuleManifest, SYMBOLIC_NAME_HEADER, VERSION_HEADER};
pub use package::{MANIFEST_ENTRY, ModulePackage, PackageBuilder};
pub use version::ModuleVersion;
