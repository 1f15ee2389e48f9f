//! Frame-by-frame engine for a single-screen swarm shooter.
//!
//! `GameState::step` turns one immutable state plus a key snapshot into the
//! next state and the effects the driver should perform.

pub mod collision;
pub mod compute;
pub mod config;
pub mod effects;
pub mod entities;
pub mod state;
pub mod update;

pub use compute::Step;
pub use config::{ConfigError, GameConfig};
pub use effects::{Effect, Outputs, Playable, Sound, TextSink};
pub use state::{Canvas, GameArgs, GameState, Keys, Outcome, StateField};
pub use update::{BodyField, WithFields};
