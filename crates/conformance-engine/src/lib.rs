// conformance-engine/src/lib.rs
// ============================================================================
// Module: Conformance Engine Library
// Description: Execution sink that runs cases in an external engine process.
// Purpose: Connect the harness runtime to the engine under test.
// Dependencies: conformance-core, tempfile
// ============================================================================

//! ## Overview
//! `conformance-engine` provides [`CommandEngine`], an
//! [`ExecutionSink`](conformance_core::ExecutionSink) that starts the engine
//! under test once per case, feeds it the harness prelude followed by the
//! case source, and translates marker lines on stdout into failure reports.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod command;
pub mod prelude;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command::CommandEngine;
pub use command::EngineError;
pub use command::EngineSettings;
pub use command::ScriptMode;
pub use prelude::DEFAULT_FAILURE_MARKER;
pub use prelude::default_prelude;
pub use prelude::validate_marker;
