//! Content fingerprints.
//!
//! Digests detect changed payloads across resubmissions. The dictionary
//! digest hashes entries in sorted key order, so it never depends on the
//! order the producer presented the keys in.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::dictionary::Dictionary;
use crate::error::ResourceError;

/// Chunk size for streaming reads.
const DIGEST_BUFFER_SIZE: usize = 16 * 1024;

/// SHA-256 over a staged payload file, hex encoded.
pub fn digest_file(path: &Path) -> Result<String, ResourceError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; DIGEST_BUFFER_SIZE];
    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 over a dictionary's entries: key bytes, value length, canonical
/// JSON value bytes, in sorted key order.
pub fn digest_dictionary(dictionary: &Dictionary) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in dictionary {
        let value_bytes = value.to_string().into_bytes();
        hasher.update(key.as_bytes());
        hasher.update((value_bytes.len() as u64).to_le_bytes());
        hasher.update(&value_bytes);
    }
    hex::encode(hasher.finalize())
}
