use super::{ContentDigester, DigestError};
use md5::{Digest, Md5};
use memmap2::MmapOptions;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Read buffer for files below the mmap threshold
const CHUNK_SIZE: usize = 65536;

/// Feeds the file's bytes to `update`, mapping large files and streaming small ones.
fn feed_file(
    path: &Path,
    mmap_threshold: u64,
    mut update: impl FnMut(&[u8]),
) -> std::io::Result<()> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();

    if len == 0 {
        return Ok(());
    }

    if len >= mmap_threshold {
        // SAFETY: read-only mapping, dropped before returning
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        update(&mmap);
        return Ok(());
    }

    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        update(&buffer[..bytes_read]);
    }
    Ok(())
}

/// Native MD5, byte-compatible with `md5sum`.
#[derive(Debug, Clone)]
pub struct Md5Digester {
    mmap_threshold: u64,
}

impl Md5Digester {
    /// Files at or above `mmap_threshold` bytes are memory mapped.
    #[must_use]
    pub const fn new(mmap_threshold: u64) -> Self {
        Self { mmap_threshold }
    }

    /// MD5 of an in-memory buffer.
    #[must_use]
    pub fn digest_bytes(data: &[u8]) -> String {
        format!("{:x}", Md5::digest(data))
    }
}

impl ContentDigester for Md5Digester {
    fn digest(&self, path: &Path) -> Result<String, DigestError> {
        let mut hasher = Md5::new();
        feed_file(path, self.mmap_threshold, |chunk| hasher.update(chunk))
            .map_err(|e| DigestError::io(path, e))?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn name(&self) -> &str {
        "md5"
    }
}

/// xxHash3-128, rendered as 32 hex characters.
#[derive(Debug, Clone)]
pub struct Xxh3Digester {
    mmap_threshold: u64,
}

impl Xxh3Digester {
    /// Files at or above `mmap_threshold` bytes are memory mapped.
    #[must_use]
    pub const fn new(mmap_threshold: u64) -> Self {
        Self { mmap_threshold }
    }

    /// xxHash3-128 of an in-memory buffer.
    #[must_use]
    pub fn digest_bytes(data: &[u8]) -> String {
        format!("{:032x}", xxhash_rust::xxh3::xxh3_128(data))
    }
}

impl ContentDigester for Xxh3Digester {
    fn digest(&self, path: &Path) -> Result<String, DigestError> {
        let mut hasher = Xxh3::new();
        feed_file(path, self.mmap_threshold, |chunk| hasher.update(chunk))
            .map_err(|e| DigestError::io(path, e))?;
        Ok(format!("{:032x}", hasher.digest128()))
    }

    fn name(&self) -> &str {
        "xxh3"
    }
}
