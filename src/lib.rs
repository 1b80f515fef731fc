//! Life-fortune trend chart engine.
//!
//! Multi-dimension trend data with year windows, a chart controller that maps
//! pointer clicks to years, and a cancelable insight session that reveals
//! analysis text for the selected year.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod insight;
pub mod lookup;
pub mod trend;

#[cfg(test)]
mod testutil;

pub use error::{Error, Result};
