// conformance-core/src/core/codec.rs
// ============================================================================
// Module: Payload Codec
// Description: Base64 decoding of encoded test-case bodies.
// Purpose: Turn manifest payloads into runnable source text and back.
// Dependencies: base64
// ============================================================================

//! ## Overview
//! Manifest payloads carry each case's source as standard, padded base64.
//! Exported suites are often line-wrapped, so ASCII whitespace inside the
//! payload is ignored before decoding. Decoded bytes must be UTF-8.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Payload decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Base64(String),
    /// Decoded payload is not valid UTF-8.
    #[error("payload is not valid utf-8: {0}")]
    Utf8(String),
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Decodes an encoded payload into source text.
///
/// # Errors
///
/// Returns [`CodecError`] when the payload is not base64 or not UTF-8.
pub fn decode_payload(encoded: &str) -> Result<String, CodecError> {
    let compact: Vec<u8> =
        encoded.bytes().filter(|byte| !byte.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(&compact).map_err(|err| CodecError::Base64(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| CodecError::Utf8(err.utf8_error().to_string()))
}

/// Encodes source text into a manifest payload.
#[must_use]
pub fn encode_payload(source: &str) -> String {
    STANDARD.encode(source.as_bytes())
}
