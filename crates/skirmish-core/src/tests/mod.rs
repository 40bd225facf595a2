//! Crate-level tests for the duel engine.
//!
//! - **Determinism tests**: the same seed replays the same battle
//! - **Integration tests**: full battles through the session and the world
//! - **Property tests**: resource bounds hold under arbitrary action sequences
//! - **Helper functions**: scripted dice and combatant factories
//!
//! # Test Structure
//!
//! - `determinism.rs`: Seeded replays
//! - `integration.rs`: End-to-end battle scenarios
//! - `properties.rs`: `proptest` invariants
//! - `helpers.rs`: Test setup utilities and factory functions

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
