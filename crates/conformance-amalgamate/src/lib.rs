// conformance-amalgamate/src/lib.rs
// ============================================================================
// Module: Conformance Build Steps
// Description: Source amalgamation, test bundling, and manifest packing.
// Purpose: Produce the artifacts a conformance run consumes.
// Dependencies: conformance-config, conformance-core, regex, serde_json
// ============================================================================

//! ## Overview
//! Three file-to-file build steps live here:
//! - [`Amalgamator`] concatenates engine sources into one translation unit;
//! - [`render_bundle`] concatenates loose test files into one script that
//!   counts its own results;
//! - [`pack_manifest`] encodes loose test files into a manifest document.
//!
//! Each step is a pure text transform plus a separate write function.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod amalgamate;
pub mod bundle;
pub mod pack;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use amalgamate::AmalgamateError;
pub use amalgamate::Amalgamator;
pub use amalgamate::write_amalgamation;
pub use bundle::BundleError;
pub use bundle::BundleSuite;
pub use bundle::DEFAULT_BUNDLE_HEADER;
pub use bundle::read_header;
pub use bundle::render_bundle;
pub use bundle::write_bundle;
pub use pack::PackError;
pub use pack::collect_test_files;
pub use pack::pack_manifest;
pub use pack::write_manifest;
