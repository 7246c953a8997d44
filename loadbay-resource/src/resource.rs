//! The registered resource entity and its construction factory.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use loadbay_pack::{ModuleManifest, ModulePackage, PackError};

use crate::dictionary::{Dictionary, read_dictionary};
use crate::digest;
use crate::error::ResourceError;
use crate::input::ResourceInput;
use crate::pid::ConfigPid;
use crate::staging::{self, StagingArea};

/// Attribute key for a module's symbolic name.
pub const SYMBOLIC_NAME_ATTRIBUTE: &str = "symbolic-name";

/// Attribute key for a module's version.
pub const VERSION_ATTRIBUTE: &str = "version";

/// Attribute key for a configuration's composite pid.
pub const CONFIG_PID_ATTRIBUTE: &str = "config-pid";

const ENTITY_MODULE_PREFIX: &str = "module:";
const ENTITY_CONFIG_PREFIX: &str = "config:";

const KIND_MODULE: &str = "module";
const KIND_CONFIG: &str = "config";

/// Canonical resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Module,
    Config,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Module => KIND_MODULE,
            ResourceKind::Config => KIND_CONFIG,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a registered resource. Exactly one variant
/// holds, so "data file or dictionary" is a structural invariant rather
/// than a runtime check.
#[derive(Debug)]
pub enum Payload {
    Module {
        data_file: PathBuf,
        manifest: ModuleManifest,
    },
    Config {
        dictionary: Dictionary,
        pid: ConfigPid,
    },
}

/// A resource registered for installation: identity, content digest,
/// canonical entity id, and the staged payload. Immutable after
/// construction except for the `installable` flag.
#[derive(Debug)]
pub struct RegisteredResource {
    id: String,
    scheme: String,
    digest: String,
    entity_id: String,
    priority: i32,
    serial: u64,
    attributes: BTreeMap<String, String>,
    payload: Payload,
    installable: AtomicBool,
}

impl RegisteredResource {
    /// Builds a registered resource from producer input. Fails fast on
    /// malformed input; on any failure after the payload copy the scratch
    /// file is removed before the error propagates.
    pub fn create(
        area: &StagingArea,
        input: ResourceInput,
        scheme: &str,
    ) -> Result<Self, ResourceError> {
        let ResourceInput {
            id,
            stream,
            dictionary,
            kind_hint,
            digest,
            priority,
        } = input;

        // Without a payload stream, config through dictionary is expected.
        let declared = if stream.is_none() {
            Some(kind_hint.unwrap_or_else(|| KIND_CONFIG.to_string()))
        } else {
            kind_hint
        };
        let kind_str = match declared.or_else(|| kind_for_extension(extension(&id))) {
            Some(kind) => kind,
            None => return Err(ResourceError::UnknownKind(id)),
        };
        let kind = match kind_str.as_str() {
            KIND_MODULE => ResourceKind::Module,
            KIND_CONFIG => ResourceKind::Config,
            _ => {
                return Err(ResourceError::UnsupportedKind { kind: kind_str, id });
            }
        };

        match kind {
            ResourceKind::Config => {
                let dictionary = match stream {
                    Some(stream) => read_dictionary(stream, extension(&id))?,
                    None => dictionary.unwrap_or_default(),
                };
                Ok(Self::new_config(area, id, dictionary, digest, priority, scheme))
            }
            ResourceKind::Module => {
                let stream = stream
                    .ok_or_else(|| ResourceError::NotAModule(format!("{scheme}:{id}")))?;
                Self::new_module(area, id, stream, digest, priority, scheme)
            }
        }
    }

    fn new_module(
        area: &StagingArea,
        id: String,
        stream: Box<dyn std::io::Read>,
        digest_hint: Option<String>,
        priority: i32,
        scheme: &str,
    ) -> Result<Self, ResourceError> {
        let serial = area.next_serial();
        let data_file = area.stage(serial, stream)?;

        // Everything past the copy must release the scratch file on error.
        match Self::extract_module(&id, scheme, &data_file, digest_hint) {
            Ok((manifest, digest)) => {
                let mut attributes = BTreeMap::new();
                attributes.insert(
                    SYMBOLIC_NAME_ATTRIBUTE.to_string(),
                    manifest.symbolic_name().to_string(),
                );
                attributes.insert(VERSION_ATTRIBUTE.to_string(), manifest.version().to_string());
                let entity_id = format!("{ENTITY_MODULE_PREFIX}{}", manifest.symbolic_name());
                debug!(url = %format_url(scheme, &id), %entity_id, "registered module resource");

                Ok(Self {
                    id,
                    scheme: scheme.to_string(),
                    digest,
                    entity_id,
                    priority,
                    serial,
                    attributes,
                    payload: Payload::Module {
                        data_file,
                        manifest,
                    },
                    installable: AtomicBool::new(true),
                })
            }
            Err(e) => {
                staging::remove_if_exists(&data_file);
                Err(e)
            }
        }
    }

    fn extract_module(
        id: &str,
        scheme: &str,
        data_file: &Path,
        digest_hint: Option<String>,
    ) -> Result<(ModuleManifest, String), ResourceError> {
        let reader = BufReader::new(File::open(data_file)?);
        let package = match ModulePackage::open(reader) {
            Ok(package) => package,
            // A byte stream that is not an archive at all does not contain
            // a module; manifest-level problems keep their own errors.
            Err(PackError::Zip(_)) => {
                return Err(ResourceError::NotAModule(format_url(scheme, id)));
            }
            Err(e) => return Err(e.into()),
        };

        let digest = match digest_hint.filter(|d| !d.is_empty()) {
            Some(digest) => digest,
            None => format!("{id}:{}", digest::digest_file(data_file)?),
        };

        Ok((package.manifest().clone(), digest))
    }

    fn new_config(
        area: &StagingArea,
        id: String,
        dictionary: Dictionary,
        digest_hint: Option<String>,
        priority: i32,
        scheme: &str,
    ) -> Self {
        let serial = area.next_serial();
        let pid = ConfigPid::from_url(scheme, &id);
        let entity_id = format!("{ENTITY_CONFIG_PREFIX}{}", pid.composite_pid());

        let digest = match digest_hint.filter(|d| !d.is_empty()) {
            Some(digest) => digest,
            None => format!("{id}:{}", digest::digest_dictionary(&dictionary)),
        };

        let mut attributes = BTreeMap::new();
        attributes.insert(CONFIG_PID_ATTRIBUTE.to_string(), pid.composite_pid());
        debug!(url = %format_url(scheme, &id), %entity_id, "registered config resource");

        Self {
            id,
            scheme: scheme.to_string(),
            digest,
            entity_id,
            priority,
            serial,
            attributes,
            payload: Payload::Config { dictionary, pid },
            installable: AtomicBool::new(true),
        }
    }

    /// Globally unique resource URL: `scheme:id`.
    pub fn url(&self) -> String {
        format_url(&self.scheme, &self.id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn kind(&self) -> ResourceKind {
        match &self.payload {
            Payload::Module { .. } => ResourceKind::Module,
            Payload::Config { .. } => ResourceKind::Config,
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Canonical identity shared by all resources competing for the same
    /// logical install slot.
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The configuration dictionary, for config resources.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        match &self.payload {
            Payload::Config { dictionary, .. } => Some(dictionary),
            Payload::Module { .. } => None,
        }
    }

    /// The extracted manifest, for module resources.
    pub fn module_manifest(&self) -> Option<&ModuleManifest> {
        match &self.payload {
            Payload::Module { manifest, .. } => Some(manifest),
            Payload::Config { .. } => None,
        }
    }

    /// The staged payload file, for module resources.
    pub fn data_file(&self) -> Option<&Path> {
        match &self.payload {
            Payload::Module { data_file, .. } => Some(data_file),
            Payload::Config { .. } => None,
        }
    }

    pub fn is_installable(&self) -> bool {
        self.installable.load(Ordering::SeqCst)
    }

    /// Marks the resource as withdrawn (or reinstated) without destroying
    /// it. Visible to concurrent readers.
    pub fn set_installable(&self, installable: bool) {
        self.installable.store(installable, Ordering::SeqCst);
    }

    /// A fresh buffered reader over the staged payload, or `None` for
    /// config resources and for modules whose storage was cleaned up.
    pub fn open_payload(&self) -> std::io::Result<Option<BufReader<File>>> {
        match &self.payload {
            Payload::Module { data_file, .. } if data_file.exists() => {
                Ok(Some(BufReader::new(File::open(data_file)?)))
            }
            _ => Ok(None),
        }
    }

    /// Removes the staged payload file if present. Idempotent; never
    /// errors. The payload must not be read again afterwards.
    pub fn cleanup(&self) {
        if let Payload::Module { data_file, .. } = &self.payload {
            staging::remove_if_exists(data_file);
        }
    }
}

impl fmt::Display for RegisteredResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RegisteredResource {}, digest={}, serial={}",
            self.url(),
            self.digest,
            self.serial
        )
    }
}

fn format_url(scheme: &str, id: &str) -> String {
    format!("{scheme}:{id}")
}

/// The id's file extension, or the empty string when it has none.
fn extension(id: &str) -> &str {
    id.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Maps a file extension to a kind string. Unrecognized extensions are
/// passed through as the kind itself, to be rejected as unsupported; an
/// absent extension determines nothing.
fn kind_for_extension(ext: &str) -> Option<String> {
    match ext {
        "jar" => Some(KIND_MODULE.to_string()),
        "cfg" | "config" | "xml" | "properties" => Some(KIND_CONFIG.to_string()),
        "" => None,
        other => Some(other.to_string()),
    }
}
