// conformance-core/src/core/mod.rs
// ============================================================================
// Module: Conformance Harness Core Types
// Description: Manifest, outcome, tally, and codec types.
// Purpose: Provide stable, serializable types shared by every harness surface.
// Dependencies: base64, serde, sha2
// ============================================================================

//! ## Overview
//! Core types describe what the harness consumes (manifests and their encoded
//! cases) and what it produces (per-case outcomes folded into tallies). They
//! carry no execution logic beyond decoding and bookkeeping.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod codec;
pub mod hashing;
pub mod manifest;
pub mod outcome;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::CodecError;
pub use codec::decode_payload;
pub use codec::encode_payload;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::hash_bytes;
pub use manifest::MAX_MANIFEST_BYTES;
pub use manifest::ManifestDocument;
pub use manifest::ManifestError;
pub use manifest::TestCase;
pub use manifest::TestManifest;
pub use manifest::TestsCollection;
pub use outcome::CaseOutcome;
pub use outcome::CaseRecord;
pub use outcome::ExceptionKind;
pub use outcome::RunReport;
pub use outcome::RunTally;
pub use outcome::SuiteReport;
