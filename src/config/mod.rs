//! Engine-defaults configuration.
//!
//! Work schedules may leave their tolerance and half-day fields null;
//! the values here are the engine-wide fallbacks those nulls resolve to.
//! There are no hardcoded fallbacks: the defaults file is mandatory.

mod loader;
mod types;

pub use loader::DefaultsLoader;
pub use types::EngineDefaults;
