//! Module artifact opening and building.

use std::io::{Read, Seek, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::PackError;
use crate::manifest::ModuleManifest;

/// Archive entry holding the manifest headers.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// An opened module artifact with its parsed manifest.
#[derive(Debug)]
pub struct ModulePackage {
    manifest: ModuleManifest,
}

impl ModulePackage {
    /// Opens a module artifact and extracts its manifest. The reader is
    /// consumed and dropped on every path, success or failure.
    pub fn open<R: Read + Seek>(reader: R) -> Result<Self, PackError> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entry = match archive.by_name(MANIFEST_ENTRY) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(PackError::MissingManifest),
            Err(e) => return Err(e.into()),
        };
        let mut text = String::new();
        entry.read_to_string(&mut text)?;

        Ok(Self {
            manifest: ModuleManifest::parse(&text)?,
        })
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }
}

/// Fluent builder for creating module artifacts.
pub struct PackageBuilder {
    manifest: ModuleManifest,
    entries: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub fn new(manifest: ModuleManifest) -> Self {
        Self {
            manifest,
            entries: Vec::new(),
        }
    }

    /// Adds a payload entry under the given archive path.
    pub fn add_entry(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.entries.push((name.into(), data));
        self
    }

    /// Builds the artifact and returns the raw archive bytes.
    pub fn build(self) -> Result<Vec<u8>, PackError> {
        let buf = std::io::Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(buf);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(MANIFEST_ENTRY, options)?;
        zip.write_all(self.manifest.to_text().as_bytes())?;

        for (name, data) in &self.entries {
            zip.start_file(name, options)?;
            zip.write_all(data)?;
        }

        let finished = zip.finish()?;
        Ok(finished.into_inner())
    }
}
