//! Disk persistence for trained artifacts using bincode serialization.
//!
//! Artifacts are written as `[bincode payload][magic "DSA1"][CRC32 BE]` via an
//! atomic temp-file + rename. Loading verifies the footer before decoding, so
//! a truncated or corrupted file is reported instead of half-loaded.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Magic bytes preceding the CRC32 footer.
const ARTIFACT_CRC_MAGIC: &[u8; 4] = b"DSA1";

/// Serialize `value` to `path` with a CRC32 footer.
pub fn save_artifact<T: Serialize>(value: &T, path: &Path) -> io::Result<()> {
    let bytes = bincode::serialize(value).map_err(|e| io::Error::other(e.to_string()))?;
    let crc = crc32fast::hash(&bytes);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");

    let mut output = Vec::with_capacity(bytes.len() + 8);
    output.extend_from_slice(&bytes);
    output.extend_from_slice(ARTIFACT_CRC_MAGIC);
    output.extend_from_slice(&crc.to_be_bytes());

    fs::write(&tmp_path, &output)?;
    fs::rename(&tmp_path, path)?;

    tracing::info!(
        "Saved artifact {:?} ({} bytes, CRC32={:#010x})",
        path,
        bytes.len(),
        crc
    );
    Ok(())
}

/// Load an artifact written by [`save_artifact`], verifying its checksum.
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> io::Result<T> {
    let raw = fs::read(path)?;

    if raw.len() < 8 || &raw[raw.len() - 8..raw.len() - 4] != ARTIFACT_CRC_MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Artifact {:?} is missing its checksum footer", path),
        ));
    }
    let payload = &raw[..raw.len() - 8];
    let stored_crc = u32::from_be_bytes([
        raw[raw.len() - 4],
        raw[raw.len() - 3],
        raw[raw.len() - 2],
        raw[raw.len() - 1],
    ]);
    let computed_crc = crc32fast::hash(payload);
    if computed_crc != stored_crc {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Artifact CRC32 mismatch: expected {:#010x}, got {:#010x}. File may be corrupted: {:?}",
                stored_crc, computed_crc, path
            ),
        ));
    }
    tracing::debug!("Artifact CRC32 verified: {:#010x}", stored_crc);

    bincode::deserialize(payload).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("map.bin");
        let mut value: HashMap<String, Vec<f32>> = HashMap::new();
        value.insert("a".into(), vec![1.0, 2.5]);
        save_artifact(&value, &path).unwrap();
        let loaded: HashMap<String, Vec<f32>> = load_artifact(&path).unwrap();
        assert_eq!(loaded, value);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_detects_corruption() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("v.bin");
        save_artifact(&vec![1u32, 2, 3, 4], &path).unwrap();
        let mut raw = fs::read(&path).unwrap();
        raw[0] ^= 0xFF;
        fs::write(&path, &raw).unwrap();
        let err = load_artifact::<Vec<u32>>(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("CRC32 mismatch"));
    }

    #[test]
    fn test_rejects_missing_footer() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("raw.bin");
        fs::write(&path, bincode::serialize(&vec![1u32]).unwrap()).unwrap();
        let err = load_artifact::<Vec<u32>>(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_artifact::<Vec<u32>>(Path::new("/nonexistent/artifact.bin")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
