// conformance-core/src/runtime/source.rs
// ============================================================================
// Module: File Manifest Source
// Description: Loads manifest documents from disk in a fixed order.
// Purpose: Supply suites to the run aggregator with exclusions applied.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Suite identifiers are the manifest paths themselves. Negative cases and
//! excluded case paths are removed as each manifest is loaded, so the suite
//! iterator only ever sees the cases it must run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::core::ManifestError;
use crate::core::TestManifest;
use crate::interfaces::ManifestSource;

// ============================================================================
// SECTION: File Manifest Source
// ============================================================================

/// Manifest source backed by JSON files.
#[derive(Debug, Clone, Default)]
pub struct FileManifestSource {
    /// Manifest paths in run order.
    paths: Vec<PathBuf>,
    /// Case paths removed from every manifest.
    exclude: BTreeSet<String>,
}

impl FileManifestSource {
    /// Creates a source over manifest paths in run order.
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            exclude: BTreeSet::new(),
        }
    }

    /// Sets the case paths excluded from every manifest.
    #[must_use]
    pub fn with_exclusions(mut self, exclude: impl IntoIterator<Item = String>) -> Self {
        self.exclude = exclude.into_iter().collect();
        self
    }

    /// Returns the manifest paths in run order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ManifestSource for FileManifestSource {
    fn suite_ids(&self) -> Vec<String> {
        self.paths.iter().map(|path| path.to_string_lossy().into_owned()).collect()
    }

    fn load(&self, suite_id: &str) -> Result<TestManifest, ManifestError> {
        let mut manifest = TestManifest::load(Path::new(suite_id))?;
        manifest.drop_negative();
        manifest.exclude(&self.exclude);
        Ok(manifest)
    }
}
