// conformance-amalgamate/src/pack.rs
// ============================================================================
// Module: Manifest Packer
// Description: Encodes loose test files into a manifest document.
// Purpose: Author manifests from a directory of test sources.
// Dependencies: conformance-core, serde_json
// ============================================================================

//! ## Overview
//! Packing is the inverse of manifest loading: each listed file is read,
//! skipped when excluded, and stored as an encoded payload under its listed
//! path. File order is preserved so the packed suite runs in the order given.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use conformance_core::TestCase;
use conformance_core::TestManifest;
use conformance_core::encode_payload;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Extension of test files picked up by directory collection.
const TEST_FILE_EXTENSION: &str = "js";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Manifest packing errors.
#[derive(Debug, Error)]
pub enum PackError {
    /// A test file or the output could not be accessed.
    #[error("pack io error at {path}: {error}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error message.
        error: String,
    },
    /// The manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Serialize(String),
    /// The packing request is invalid.
    #[error("invalid pack request: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Packing
// ============================================================================

/// Packs `files` (relative to `base_dir`) into a manifest named `name`.
///
/// # Errors
///
/// Returns [`PackError`] when the name is blank or a file cannot be read as UTF-8 text.
pub fn pack_manifest(
    name: &str,
    base_dir: &Path,
    files: &[String],
    exclude: &BTreeSet<String>,
) -> Result<TestManifest, PackError> {
    if name.trim().is_empty() {
        return Err(PackError::Invalid("manifest name must be non-empty".to_string()));
    }
    let mut cases = Vec::with_capacity(files.len());
    for file in files.iter().filter(|file| !exclude.contains(*file)) {
        let path = base_dir.join(file);
        let source = fs::read_to_string(&path).map_err(|err| io_error(&path, &err))?;
        cases.push(TestCase {
            path: file.clone(),
            code: encode_payload(&source),
            negative: None,
        });
    }
    Ok(TestManifest::new(name, cases))
}

/// Lists test files directly inside `dir`, sorted by name.
///
/// # Errors
///
/// Returns [`PackError::Io`] when the directory cannot be listed.
pub fn collect_test_files(dir: &Path) -> Result<Vec<String>, PackError> {
    let entries = fs::read_dir(dir).map_err(|err| io_error(dir, &err))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| io_error(dir, &err))?.path();
        if path.is_file()
            && path.extension().is_some_and(|ext| ext == TEST_FILE_EXTENSION)
            && let Some(file_name) = path.file_name()
        {
            files.push(file_name.to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// Writes the manifest document for `manifest` to `path`.
///
/// # Errors
///
/// Returns [`PackError`] when serialization or the write fails.
pub fn write_manifest(path: &Path, manifest: &TestManifest) -> Result<(), PackError> {
    let mut json = serde_json::to_string_pretty(&manifest.to_document())
        .map_err(|err| PackError::Serialize(err.to_string()))?;
    json.push('\n');
    fs::write(path, json).map_err(|err| io_error(path, &err))
}

/// Maps an IO error for `path`.
fn io_error(path: &Path, err: &std::io::Error) -> PackError {
    PackError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    }
}
