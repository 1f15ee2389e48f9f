/// The game aggregate: every body, counter and flag for one frame.
///
/// A `GameState` is immutable once built.  Entity sequences live behind
/// `Arc<[T]>`, so copying a state to replace one field shares the sequences
/// rather than duplicating them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::entities::{enemy_grid, Enemy, EnemyBullet, Player, PlayerBullet};
use crate::update::WithFields;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Drawing-surface size the engine needs to know about.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
        }
    }
}

/// Keys held during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    pub restart: bool,
}

/// Construction arguments.  Anything left as `None` takes its default, and
/// restarting a game rebuilds it from the very same arguments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameArgs {
    pub canvas: Canvas,
    pub config: GameConfig,
    pub game_running: Option<bool>,
    pub player: Option<Player>,
    pub enemies: Option<Vec<Enemy>>,
    pub player_bullets: Option<Vec<PlayerBullet>>,
    pub enemy_bullets: Option<Vec<EnemyBullet>>,
    pub player_bullet_cooldown: Option<u32>,
    /// Overrides `config.player_cooldown_period`.
    pub player_final_bullet_cooldown: Option<u32>,
    /// Overrides `config.swarm_velocity_x`.
    pub swarm_velocity_x: Option<f32>,
}

impl GameArgs {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }
}

/// How a frame left the game, derived from the flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Won,
    Lost,
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    args: Arc<GameArgs>,
    game_running: bool,
    player: Option<Player>,
    enemies: Arc<[Enemy]>,
    player_bullets: Arc<[PlayerBullet]>,
    enemy_bullets: Arc<[EnemyBullet]>,
    player_bullet_cooldown: u32,
    player_cooldown_period: u32,
    swarm_velocity_x: f32,
}

/// Replaceable fields of a [`GameState`].  Configuration and canvas are
/// fixed for the lifetime of a game and cannot be patched.
#[derive(Clone, Debug, PartialEq)]
pub enum StateField {
    GameRunning(bool),
    Player(Option<Player>),
    Enemies(Arc<[Enemy]>),
    PlayerBullets(Arc<[PlayerBullet]>),
    EnemyBullets(Arc<[EnemyBullet]>),
    PlayerBulletCooldown(u32),
    SwarmVelocityX(f32),
}

impl GameState {
    pub fn new(args: GameArgs) -> Self {
        let config = args.config;
        Self {
            game_running: args.game_running.unwrap_or(true),
            player: Some(args.player.unwrap_or_default()),
            enemies: args.enemies.clone().unwrap_or_else(enemy_grid).into(),
            player_bullets: args.player_bullets.clone().unwrap_or_default().into(),
            enemy_bullets: args.enemy_bullets.clone().unwrap_or_default().into(),
            player_bullet_cooldown: args.player_bullet_cooldown.unwrap_or(0),
            player_cooldown_period: args
                .player_final_bullet_cooldown
                .unwrap_or(config.player_cooldown_period),
            swarm_velocity_x: args.swarm_velocity_x.unwrap_or(config.swarm_velocity_x),
            args: Arc::new(args),
        }
    }

    /// A brand-new game built from the arguments this one started with.
    pub fn restarted(&self) -> Self {
        Self::new((*self.args).clone())
    }

    pub fn args(&self) -> &GameArgs {
        &self.args
    }

    pub fn config(&self) -> &GameConfig {
        &self.args.config
    }

    pub fn canvas(&self) -> Canvas {
        self.args.canvas
    }

    pub fn game_running(&self) -> bool {
        self.game_running
    }

    /// `None` once the player has been killed.
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub(crate) fn shared_enemies(&self) -> Arc<[Enemy]> {
        Arc::clone(&self.enemies)
    }

    pub fn player_bullets(&self) -> &[PlayerBullet] {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &[EnemyBullet] {
        &self.enemy_bullets
    }

    pub fn player_bullet_cooldown(&self) -> u32 {
        self.player_bullet_cooldown
    }

    pub fn player_cooldown_period(&self) -> u32 {
        self.player_cooldown_period
    }

    pub fn swarm_velocity_x(&self) -> f32 {
        self.swarm_velocity_x
    }

    /// Only meaningful after the pipeline ended the game: a state built
    /// with `game_running: Some(false)` and a live player reports `Won`
    /// even though nothing was won.
    pub fn outcome(&self) -> Outcome {
        match (self.game_running, self.player.is_some()) {
            (true, _) => Outcome::Running,
            (false, true) => Outcome::Won,
            (false, false) => Outcome::Lost,
        }
    }
}

impl WithFields for GameState {
    type Field = StateField;

    fn with_field(&self, field: StateField) -> Self {
        let base = self.clone();
        match field {
            StateField::GameRunning(game_running) => Self { game_running, ..base },
            StateField::Player(player) => Self { player, ..base },
            StateField::Enemies(enemies) => Self { enemies, ..base },
            StateField::PlayerBullets(player_bullets) => Self { player_bullets, ..base },
            StateField::EnemyBullets(enemy_bullets) => Self { enemy_bullets, ..base },
            StateField::PlayerBulletCooldown(player_bullet_cooldown) => Self {
                player_bullet_cooldown,
                ..base
            },
            StateField::SwarmVelocityX(swarm_velocity_x) => Self {
                swarm_velocity_x,
                ..base
            },
        }
    }
}
