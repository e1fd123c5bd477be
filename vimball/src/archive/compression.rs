//! gzip handling for compressed vimballs (`.vba.gz`).
//!
//! Compressed archives are detected by their magic bytes rather than their
//! file name, so a renamed `.vba.gz` still installs.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{VimballError, VimballResult};

/// gzip magic bytes (RFC 1952).
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether `bytes` starts with the gzip magic.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == GZIP_MAGIC[0] && bytes[1] == GZIP_MAGIC[1]
}

/// Compress `bytes` into a gzip stream.
pub fn gzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Decompress a gzip stream. Concatenated members are read as one stream.
pub fn gunzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Read an archive file, decompressing it if it is gzipped.
pub fn read_archive_bytes(path: &Path) -> VimballResult<Vec<u8>> {
    let raw = fs::read(path).map_err(|e| VimballError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    if is_gzip(&raw) {
        gunzip(&raw).map_err(|e| VimballError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_gzip_output_has_magic() {
        let compressed = gzip(b"UseVimball\n").unwrap();
        assert!(is_gzip(&compressed));
        assert_eq!(gunzip(&compressed).unwrap(), b"UseVimball\n");
    }

    #[test]
    fn test_is_gzip_short_input() {
        assert!(!is_gzip(&[]));
        assert!(!is_gzip(&[0x1f]));
        assert!(!is_gzip(b"\" Vimball"));
    }

    #[test]
    fn test_read_archive_bytes_plain_and_compressed() {
        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("foo.vba");
        let packed = temp.path().join("foo.vba.gz");
        fs::write(&plain, b"finish\n").unwrap();
        fs::write(&packed, gzip(b"finish\n").unwrap()).unwrap();

        assert_eq!(read_archive_bytes(&plain).unwrap(), b"finish\n");
        assert_eq!(read_archive_bytes(&packed).unwrap(), b"finish\n");
    }

    #[test]
    fn test_read_archive_bytes_missing_file() {
        let err = read_archive_bytes(Path::new("/nonexistent/foo.vba")).unwrap_err();
        assert!(matches!(err, VimballError::ReadFailed { .. }));
    }

    #[test]
    fn test_corrupt_gzip_is_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.vba.gz");
        fs::write(&path, [0x1f, 0x8b, 0x00, 0x01]).unwrap();
        assert!(read_archive_bytes(&path).is_err());
    }
}
