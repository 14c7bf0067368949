// conformance-cli/src/lib.rs
// ============================================================================
// Module: Conformance CLI Library
// Description: Shared helpers for the conformance command-line interface.
// Purpose: Provide reusable components (i18n) for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses the message catalog used by the `conformance`
//! binary. The entry point (`src/main.rs`) routes every user-facing string
//! through the [`t!`](crate::t) macro to keep output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
