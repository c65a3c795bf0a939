//! Transactional in-memory store.
//!
//! Owns every persisted entity and serializes writes to a given
//! (employee, date) so a holiday cascade and a manual correction can
//! never interleave. Bulk operations (the holiday cascade) stage their
//! writes and commit all rows or none.

mod engine;

pub use engine::{CascadeReport, EngineStore};
