//! Artifact decompression.
//!
//! The model artifact may be shipped compressed. Before loading, it is
//! decompressed once next to the compressed copy; later startups find the
//! decompressed file and skip the work.
//!
//! # Example
//!
//! ```
//! use rumah_serving::compression::CompressionType;
//!
//! assert_eq!(CompressionType::from_extension("model.json.gz"), CompressionType::Gzip);
//! assert_eq!(CompressionType::from_extension("model.json"), CompressionType::None);
//! ```

use crate::error::{ServingError, ServingResult};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported compression types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionType {
    /// No compression.
    #[default]
    None,
    /// Gzip compression.
    Gzip,
    /// Zlib compression.
    Zlib,
}

impl CompressionType {
    /// Detects the compression type from a file extension.
    pub fn from_extension(path: &str) -> Self {
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".gz") || path_lower.ends_with(".gzip") {
            CompressionType::Gzip
        } else if path_lower.ends_with(".zlib") || path_lower.ends_with(".z") {
            CompressionType::Zlib
        } else {
            CompressionType::None
        }
    }
}

/// Decompresses data using the specified compression type.
///
/// # Errors
///
/// Returns an error if the `gzip` feature is disabled for a compressed type
/// or if the data is corrupt.
pub fn decompress(data: &[u8], compression: CompressionType) -> ServingResult<Vec<u8>> {
    match compression {
        CompressionType::None => Ok(data.to_vec()),
        CompressionType::Gzip => decompress_gzip(data),
        CompressionType::Zlib => decompress_zlib(data),
    }
}

#[cfg(feature = "gzip")]
fn decompress_gzip(data: &[u8]) -> ServingResult<Vec<u8>> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| ServingError::decompression(format!("gzip: {}", e)))?;
    Ok(decompressed)
}

#[cfg(not(feature = "gzip"))]
fn decompress_gzip(_data: &[u8]) -> ServingResult<Vec<u8>> {
    Err(ServingError::decompression(
        "gzip support is not enabled; rebuild with the `gzip` feature",
    ))
}

#[cfg(feature = "gzip")]
fn decompress_zlib(data: &[u8]) -> ServingResult<Vec<u8>> {
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| ServingError::decompression(format!("zlib: {}", e)))?;
    Ok(decompressed)
}

#[cfg(not(feature = "gzip"))]
fn decompress_zlib(_data: &[u8]) -> ServingResult<Vec<u8>> {
    Err(ServingError::decompression(
        "zlib support is not enabled; rebuild with the `gzip` feature",
    ))
}

/// What [`ensure_decompressed`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecompressOutcome {
    /// The target already existed; nothing was touched.
    AlreadyPresent,
    /// The compressed file was expanded into the target.
    Decompressed {
        /// Number of bytes written.
        bytes: usize,
    },
    /// Neither file exists; loading will report the missing target.
    SourceMissing,
}

/// Decompress `compressed` into `target` unless `target` already exists.
///
/// The output is written to a sibling temporary file and renamed into place,
/// so an interrupted run never leaves a truncated target behind.
pub fn ensure_decompressed(compressed: &Path, target: &Path) -> ServingResult<DecompressOutcome> {
    if target.exists() {
        debug!("{:?} already present, skipping decompression", target);
        return Ok(DecompressOutcome::AlreadyPresent);
    }
    if !compressed.exists() {
        debug!("No compressed artifact at {:?}", compressed);
        return Ok(DecompressOutcome::SourceMissing);
    }

    let kind = CompressionType::from_extension(&compressed.to_string_lossy());
    info!("Decompressing {:?} ({:?}) into {:?}", compressed, kind, target);

    let data = std::fs::read(compressed).map_err(|e| {
        ServingError::decompression(format!("failed to read {:?}: {}", compressed, e))
    })?;
    let bytes = decompress(&data, kind)?;

    let partial = partial_path(target);
    write_then_rename(&partial, target, &bytes).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        ServingError::decompression(format!("failed to write {:?}: {}", target, e))
    })?;

    info!("Decompressed {} bytes into {:?}", bytes.len(), target);
    Ok(DecompressOutcome::Decompressed { bytes: bytes.len() })
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    target.with_file_name(name)
}

fn write_then_rename(partial: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    std::fs::write(partial, bytes)?;
    std::fs::rename(partial, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_compression_type_from_extension() {
        assert_eq!(
            CompressionType::from_extension("model.json.gz"),
            CompressionType::Gzip
        );
        assert_eq!(
            CompressionType::from_extension("MODEL.JSON.GZIP"),
            CompressionType::Gzip
        );
        assert_eq!(
            CompressionType::from_extension("model.json.zlib"),
            CompressionType::Zlib
        );
        assert_eq!(
            CompressionType::from_extension("model.json"),
            CompressionType::None
        );
    }

    #[test]
    fn test_decompress_formats() {
        let data = br#"{"type":"linear","coefficients":[1.0],"intercept":0.0}"#;
        assert_eq!(decompress(data, CompressionType::None).unwrap(), data);
        assert_eq!(decompress(&gzip(data), CompressionType::Gzip).unwrap(), data);
        assert_eq!(decompress(&zlib(data), CompressionType::Zlib).unwrap(), data);
    }

    #[test]
    fn test_corrupt_input_is_decompression_error() {
        let err = decompress(b"definitely not gzip", CompressionType::Gzip).unwrap_err();
        assert!(matches!(err, ServingError::DecompressionError(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_ensure_decompressed_is_idempotent() {
        let dir = tempdir().unwrap();
        let compressed = dir.path().join("model.json.gz");
        let target = dir.path().join("model.json");
        std::fs::write(&compressed, gzip(b"first")).unwrap();

        let outcome = ensure_decompressed(&compressed, &target).unwrap();
        assert_eq!(outcome, DecompressOutcome::Decompressed { bytes: 5 });
        assert_eq!(std::fs::read(&target).unwrap(), b"first");
        assert!(!dir.path().join("model.json.partial").exists());

        // A changed archive does not overwrite an existing target.
        std::fs::write(&compressed, gzip(b"second")).unwrap();
        let outcome = ensure_decompressed(&compressed, &target).unwrap();
        assert_eq!(outcome, DecompressOutcome::AlreadyPresent);
        assert_eq!(std::fs::read(&target).unwrap(), b"first");
    }

    #[test]
    fn test_ensure_decompressed_without_source() {
        let dir = tempdir().unwrap();
        let outcome = ensure_decompressed(
            &dir.path().join("model.json.gz"),
            &dir.path().join("model.json"),
        )
        .unwrap();
        assert_eq!(outcome, DecompressOutcome::SourceMissing);
    }

    #[test]
    fn test_ensure_decompressed_corrupt_leaves_no_target() {
        let dir = tempdir().unwrap();
        let compressed = dir.path().join("model.json.gz");
        let target = dir.path().join("model.json");
        std::fs::write(&compressed, b"garbage").unwrap();

        let err = ensure_decompressed(&compressed, &target).unwrap_err();
        assert!(matches!(err, ServingError::DecompressionError(_)));
        assert!(!target.exists());
    }
}
