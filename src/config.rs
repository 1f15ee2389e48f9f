/// Tuning constants for one game, loadable from JSON.
///
/// Every key is optional in a config document; missing keys take the values
/// from [`GameConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frames the player must wait between shots.
    pub player_cooldown_period: u32,
    /// Starting horizontal swarm speed (signed; positive moves right).
    pub swarm_velocity_x: f32,
    /// How far the swarm drops each time it bounces off a border.
    pub swarm_step_y: f32,
    /// Horizontal player speed per frame.
    pub player_speed: f32,
    /// Any enemy lower than this ends the game.
    pub kill_zone_y: f32,
    /// Per-frame chance, in percent, that the swarm fires.
    pub enemy_fire_chance_percent: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_cooldown_period: 40,
            swarm_velocity_x: 2.0,
            swarm_step_y: 10.0,
            player_speed: 5.0,
            kill_zone_y: 500.0,
            enemy_fire_chance_percent: 1.0,
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}
