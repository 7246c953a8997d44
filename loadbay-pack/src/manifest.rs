//! Module manifest parsing and rendering.
//!
//! The manifest is the `Key: Value` header section embedded in every module
//! artifact. Long values wrap at 72 columns; a line starting with a single
//! space continues the previous value.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PackError;
use crate::version::ModuleVersion;

/// Header declaring the module's symbolic name.
pub const SYMBOLIC_NAME_HEADER: &str = "Module-SymbolicName";

/// Header declaring the module's version.
pub const VERSION_HEADER: &str = "Module-Version";

/// The identity attributes of a module artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    symbolic_name: String,
    version: ModuleVersion,
}

impl ModuleManifest {
    pub fn new(symbolic_name: impl Into<String>, version: ModuleVersion) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            version,
        }
    }

    pub fn symbolic_name(&self) -> &str {
        &self.symbolic_name
    }

    pub fn version(&self) -> &ModuleVersion {
        &self.version
    }

    /// Parses manifest text, requiring non-empty symbolic-name and version
    /// headers. Each missing header is reported individually.
    pub fn parse(text: &str) -> Result<Self, PackError> {
        let headers = parse_headers(text);

        let symbolic_name = headers
            .get(SYMBOLIC_NAME_HEADER)
            .filter(|v| !v.is_empty())
            .ok_or(PackError::MissingSymbolicName)?;
        let version = headers
            .get(VERSION_HEADER)
            .filter(|v| !v.is_empty())
            .ok_or(PackError::MissingVersion)?;

        Ok(Self {
            symbolic_name: symbolic_name.clone(),
            version: ModuleVersion::from_str(version)?,
        })
    }

    /// Renders the manifest back to header text.
    pub fn to_text(&self) -> String {
        format!(
            "Manifest-Version: 1.0\n{SYMBOLIC_NAME_HEADER}: {}\n{VERSION_HEADER}: {}\n",
            self.symbolic_name, self.version
        )
    }
}

/// Splits header text into a name → value map, folding continuation lines.
fn parse_headers(text: &str) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some(name) = &current {
                if let Some(value) = headers.get_mut(name) {
                    value.push_str(continuation);
                }
            }
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) => {
                let name = name.trim().to_string();
                headers.insert(name.clone(), value.trim().to_string());
                current = Some(name);
            }
            None => current = None,
        }
    }

    headers
}
