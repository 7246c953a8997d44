//! Configuration targets.
//!
//! A configuration resource's URL names the target slot it configures. The
//! final path segment, with its config extension stripped, is the target
//! pid; a `-` separates a factory pid from an instance name
//! (`net.example.proxy-east.cfg` configures instance `east` of factory
//! `net.example.proxy`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extensions recognized as configuration files, stripped during pid
/// derivation.
const CONFIG_EXTENSIONS: &[&str] = &["cfg", "config", "xml", "properties"];

/// The parsed target of a configuration resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigPid {
    pid: String,
    factory_pid: Option<String>,
}

impl ConfigPid {
    /// Derives the configuration target from a resource URL. Directory
    /// components and a recognized config extension never contribute to
    /// the target identity.
    pub fn from_url(scheme: &str, id: &str) -> Self {
        let url = format!("{scheme}:{id}");
        let segment = url.rsplit('/').next().unwrap_or(&url);

        let name = match segment.rsplit_once('.') {
            Some((stem, extension)) if CONFIG_EXTENSIONS.contains(&extension) => stem,
            _ => segment,
        };

        match name.split_once('-') {
            Some((factory, instance)) if !factory.is_empty() && !instance.is_empty() => Self {
                pid: instance.to_string(),
                factory_pid: Some(factory.to_string()),
            },
            _ => Self {
                pid: name.to_string(),
                factory_pid: None,
            },
        }
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    pub fn factory_pid(&self) -> Option<&str> {
        self.factory_pid.as_deref()
    }

    /// The canonical key competing configurations share:
    /// `factory.instance` for factory targets, the plain pid otherwise.
    pub fn composite_pid(&self) -> String {
        match &self.factory_pid {
            Some(factory) => format!("{factory}.{}", self.pid),
            None => self.pid.clone(),
        }
    }
}

impl fmt::Display for ConfigPid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.composite_pid())
    }
}
