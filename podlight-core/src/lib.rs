//! Core types for podlight.
//!
//! This crate provides what both the podlight CLI and calendar providers share:
//! - `Event` and related types for calendar events
//! - `Color` and `Effect`, the values sent to the light
//! - the decision engine (`window`, `slot`, `effect`, `decision`)
//! - `protocol` and `provider` for talking to provider and driver binaries

pub mod color;
pub mod decision;
pub mod effect;
pub mod error;
pub mod event;
pub mod protocol;
pub mod provider;
pub mod slot;
pub mod window;

// Re-export the value types at crate root for convenience
pub use color::Color;
pub use decision::Decision;
pub use effect::{Effect, EffectPolicy, Mode};
pub use error::{PodlightError, PodlightResult};
pub use event::{Event, EventStatus, EventTime, TimeWindow};
