//! File hashing for content comparison using SHA-256

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ScanError;

/// Chunk size used when streaming file contents into the hasher
const CHUNK_SIZE: usize = 8192;

/// SHA-256 digest of a file's content
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint an in-memory buffer
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Raw digest bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..12])
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// File hasher
pub struct FileHasher;

impl FileHasher {
    /// Compute the SHA-256 fingerprint of a file by streaming its contents
    ///
    /// Memory use is bounded by [`CHUNK_SIZE`] whatever the file size.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Read`] if the file cannot be opened or read.
    pub fn hash(path: &Path) -> Result<Fingerprint, ScanError> {
        let read_error = |source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(read_error)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buffer = [0; CHUNK_SIZE];

        loop {
            let bytes_read = reader.read(&mut buffer).map_err(read_error)?;

            if bytes_read == 0 {
                break;
            }

            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Fingerprint(hasher.finalize().into()))
    }
}
