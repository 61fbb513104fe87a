use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Content digests for change detection
pub struct ContentFingerprinter;

impl ContentFingerprinter {
    /// SHA-256 of the file at `path`, as lowercase hex
    pub fn fingerprint<P: AsRef<Path>>(path: P) -> io::Result<String> {
        let file = File::open(path.as_ref())?;
        Self::fingerprint_reader(file)
    }

    /// SHA-256 of everything `reader` yields, as lowercase hex
    pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<String> {
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}
