//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunPhase`: the phase an extraction run is in (policy check, catalog, extraction, done)

mod run_phase;

pub use run_phase::RunPhase;
