//! Registered-resource core: identity, digests, staging, and ordering for
//! installable resources.
//!
//! An installable resource arrives from a producer as a declared identity
//! plus either a module payload stream or a configuration dictionary. This
//! crate classifies it, fingerprints its content so unchanged resubmissions
//! are recognized as no-ops, derives the canonical entity identity that
//! competing resources share, stages binary payloads in a process-local
//! scratch directory, and defines the total order used to pick the
//! effective resource per entity.
//!
//! Deciding *when* to install, and applying a payload to the host, belong
//! to the surrounding resolution layer — this crate only computes facts
//! about the current resource set.

mod config;
mod dictionary;
mod digest;
mod error;
mod input;
pub mod order;
mod pid;
mod resource;
mod staging;

pub use config::StagingConfig;
pub use dictionary::{Dictionary, read_dictionary};
pub use digest::{digest_dictionary, digest_file};
pub use error::ResourceError;
pub use input::{DEFAULT_PRIORITY, ResourceInput};
pub use order::compare;
pub use pid::ConfigPid;
pub use resource::{
    CONFIG_PID_ATTRIBUTE, Payload, RegisteredResource, ResourceKind, SYMBOLIC_NAME_ATTRIBUTE,
    VERSION_ATTRIBUTE,
};
pub use staging::StagingArea;
