//! Streaming file hasher.
//!
//! # Overview
//!
//! [`Hasher`] reads a file in fixed [`READ_CHUNK_SIZE`] chunks and feeds
//! every chunk into a 128-bit digest. Peak memory per file is one chunk
//! regardless of file size.
//!
//! XXH3-128 is the default algorithm. BLAKE3 is available and truncated to
//! the same 16-byte width so both produce interchangeable [`Digest`] values
//! within one run (never mix algorithms across indexes that are compared).

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use clap::ValueEnum;
use xxhash_rust::xxh3::Xxh3;

use super::HashError;

/// Chunk size for streaming reads (1 MiB).
pub const READ_CHUNK_SIZE: usize = 1024 * 1024;

/// Width of a content digest in bytes.
pub const DIGEST_LEN: usize = 16;

/// Fixed-width content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Digest algorithm used for content addressing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum HashAlgorithm {
    /// XXH3 128-bit (fast, non-cryptographic)
    #[default]
    Xxh3,
    /// BLAKE3 truncated to 128 bits
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Xxh3 => write!(f, "xxh3"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

enum DigestState {
    Xxh3(Box<Xxh3>),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Xxh3 => Self::Xxh3(Box::new(Xxh3::new())),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Xxh3(h) => h.update(chunk),
            Self::Blake3(h) => {
                h.update(chunk);
            }
        }
    }

    fn finish(self) -> Digest {
        match self {
            Self::Xxh3(h) => Digest(h.digest128().to_be_bytes()),
            Self::Blake3(h) => {
                let full = h.finalize();
                let mut bytes = [0u8; DIGEST_LEN];
                bytes.copy_from_slice(&full.as_bytes()[..DIGEST_LEN]);
                Digest(bytes)
            }
        }
    }
}

/// Single-file content hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    /// Create a hasher using the default algorithm.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher using the given algorithm.
    #[must_use]
    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash the full content of a file.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file is gone
    /// - `PermissionDenied` if it cannot be opened or read
    /// - `Io` for any other read failure, including truncation mid-read
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        self.hash_file_sized(path).map(|(digest, _)| digest)
    }

    /// Hash the full content of a file and return the number of bytes read.
    ///
    /// # Errors
    ///
    /// Same as [`hash_file`](Self::hash_file).
    pub fn hash_file_sized(&self, path: &Path) -> Result<(Digest, u64), HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;
        self.hash_counted(file)
            .map_err(|e| HashError::from_io(path.to_path_buf(), e))
    }

    /// Hash everything readable from `reader` in fixed-size chunks.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`, which is retried.
    pub fn hash_reader<R: Read>(&self, reader: R) -> io::Result<Digest> {
        self.hash_counted(reader).map(|(digest, _)| digest)
    }

    fn hash_counted<R: Read>(&self, mut reader: R) -> io::Result<(Digest, u64)> {
        let mut state = DigestState::new(self.algorithm);
        let mut buffer = vec![0u8; READ_CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    state.update(&buffer[..n]);
                    total += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok((state.finish(), total))
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> Digest {
        let mut state = DigestState::new(self.algorithm);
        state.update(data);
        state.finish()
    }
}
