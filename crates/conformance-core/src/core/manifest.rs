// conformance-core/src/core/manifest.rs
// ============================================================================
// Module: Test Manifests
// Description: On-disk manifest document and in-memory suite representation.
// Purpose: Load ordered test-case lists for one suite with strict input limits.
// Dependencies: serde, serde_json, crate::core::hashing
// ============================================================================

//! ## Overview
//! A manifest describes one named suite and its ordered cases. On disk it is
//! the `testsCollection` JSON document exported by conformance suites; in
//! memory it is a [`TestManifest`]. Extra per-case fields (descriptions,
//! chapter numbers) are ignored so raw exports load unchanged. Negative cases
//! expect the engine to throw and are dropped when a manifest is sourced,
//! since the hook-counting classification cannot score them.
//!
//! ## Invariants
//! - A manifest is immutable once loaded; exclusion happens before a run.
//! - Case order is preserved exactly as listed.
//! - Oversized or non-UTF-8 manifests fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::hash_bytes;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a manifest file in bytes.
pub const MAX_MANIFEST_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Document Types
// ============================================================================

/// One test case as listed in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Path or identifier used when reporting the case.
    pub path: String,
    /// Encoded source payload.
    pub code: String,
    /// Error class the case is expected to throw, for negative tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
}

/// Named collection of cases inside a manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestsCollection {
    /// Suite name.
    pub name: String,
    /// Ordered cases.
    pub tests: Vec<TestCase>,
}

/// On-disk manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    /// The suite collection.
    pub tests_collection: TestsCollection,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Manifest loading errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest could not be read.
    #[error("manifest io error at {path}: {error}")]
    Io {
        /// Manifest path.
        path: String,
        /// Underlying error message.
        error: String,
    },
    /// Manifest exceeds the size limit.
    #[error("manifest at {path} is {size} bytes (limit {limit})")]
    TooLarge {
        /// Manifest path.
        path: String,
        /// Observed size in bytes.
        size: u64,
        /// Size limit in bytes.
        limit: usize,
    },
    /// Manifest is not valid JSON for the expected shape.
    #[error("manifest parse error: {0}")]
    Parse(String),
    /// Manifest content is structurally invalid.
    #[error("manifest invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Test Manifest
// ============================================================================

/// In-memory suite manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestManifest {
    /// Suite name reported before the suite runs.
    pub name: String,
    /// Ordered cases.
    pub cases: Vec<TestCase>,
    /// Digest of the raw manifest bytes when loaded from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<HashDigest>,
}

impl TestManifest {
    /// Creates a manifest from a name and ordered cases.
    #[must_use]
    pub fn new(name: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Self {
            name: name.into(),
            cases,
            digest: None,
        }
    }

    /// Parses a manifest document from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the bytes are not UTF-8, not a manifest
    /// document, or name a blank suite.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| ManifestError::Invalid("manifest must be utf-8".to_string()))?;
        let document: ManifestDocument =
            serde_json::from_str(text).map_err(|err| ManifestError::Parse(err.to_string()))?;
        let collection = document.tests_collection;
        if collection.name.trim().is_empty() {
            return Err(ManifestError::Invalid("testsCollection.name must be non-empty".to_string()));
        }
        Ok(Self {
            name: collection.name,
            cases: collection.tests,
            digest: Some(hash_bytes(DEFAULT_HASH_ALGORITHM, bytes)),
        })
    }

    /// Loads a manifest document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the file cannot be read, exceeds
    /// [`MAX_MANIFEST_BYTES`], or is not a valid manifest document.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let bytes = read_manifest_bytes(path, MAX_MANIFEST_BYTES)?;
        Self::from_json_slice(&bytes)
    }

    /// Removes cases whose path appears in `excluded`, returning how many were removed.
    pub fn exclude(&mut self, excluded: &BTreeSet<String>) -> usize {
        if excluded.is_empty() {
            return 0;
        }
        let before = self.cases.len();
        self.cases.retain(|case| !excluded.contains(&case.path));
        before - self.cases.len()
    }

    /// Removes negative cases, returning how many were removed.
    pub fn drop_negative(&mut self) -> usize {
        let before = self.cases.len();
        self.cases.retain(|case| case.negative.is_none());
        before - self.cases.len()
    }

    /// Returns the on-disk document form of this manifest.
    #[must_use]
    pub fn to_document(&self) -> ManifestDocument {
        ManifestDocument {
            tests_collection: TestsCollection {
                name: self.name.clone(),
                tests: self.cases.clone(),
            },
        }
    }
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Reads a manifest file, refusing anything larger than `max_bytes`.
fn read_manifest_bytes(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ManifestError> {
    let display = path.display().to_string();
    let io_error = |err: std::io::Error| ManifestError::Io {
        path: display.clone(),
        error: err.to_string(),
    };
    let file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ManifestError::TooLarge {
            path: display.clone(),
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() > max_bytes {
        return Err(ManifestError::TooLarge {
            path: display.clone(),
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}
