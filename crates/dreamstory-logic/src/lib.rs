//! Pure day simulation logic for Dream Story.
//!
//! Alex lives through simulated days; the player picks actions in rooms of
//! Alex's home and each action moves Alex's wellness attributes and the
//! score. This crate holds all of that logic with no rendering, audio, or
//! storage, so the presentation layer only forwards clicks and clock ticks.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Action kinds and the fixed effect table |
//! | [`attributes`] | Attribute values, clamped deltas, derived mood |
//! | [`clock`] | Simulated wall clock and day boundaries |
//! | [`config`] | JSON-loadable engine settings and validation |
//! | [`engine`] | The day engine state machine driven by the caller |
//! | [`outcome`] | Applied / redirected / rejected results |
//! | [`outside`] | Relax → outside event branches |
//! | [`rooms`] | Room catalog and navigation |
//! | [`state`] | Per-session state and the daily action set |

pub mod actions;
pub mod attributes;
pub mod clock;
pub mod config;
pub mod engine;
pub mod outcome;
pub mod outside;
pub mod rooms;
pub mod state;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::actions::ActionKind;
    pub use crate::attributes::{Attributes, Mood};
    pub use crate::config::{ConfigError, EngineConfig};
    pub use crate::engine::{DayEngine, EngineError, EngineSnapshot, Preferences};
    pub use crate::outcome::{FeedbackTone, Outcome, RejectReason};
    pub use crate::outside::OutsideBranch;
    pub use crate::rooms::{Direction, RoomId};
    pub use crate::state::SimState;
}
