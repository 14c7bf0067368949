// conformance-config/src/lib.rs
// ============================================================================
// Module: Conformance Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for conformance.toml semantics.
// Dependencies: conformance-core, conformance-engine, serde, toml
// ============================================================================

//! ## Overview
//! `conformance-config` defines the configuration model for harness runs,
//! the amalgamation build step, and test bundling. Loading is strict and
//! fails closed: oversized, non-UTF-8, or inconsistent files are rejected
//! before anything runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
