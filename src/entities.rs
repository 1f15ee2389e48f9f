/// Arena bodies — small immutable values with per-frame motion.
///
/// Each body stores only its top-left position; width, height and speed are
/// fixed per kind.  Every motion method returns a new value.

use serde::{Deserialize, Serialize};

use crate::collision::{Bounded, Rect};
use crate::update::{BodyField, WithFields};

// ── Per-kind geometry ─────────────────────────────────────────────────────────

pub const PLAYER_W: f32 = 32.0;
pub const PLAYER_H: f32 = 32.0;
/// Player spawn point on the default 600-wide canvas (horizontally centred).
pub const PLAYER_START_X: f32 = 284.0;
pub const PLAYER_START_Y: f32 = 550.0;

pub const ENEMY_W: f32 = 30.0;
pub const ENEMY_H: f32 = 30.0;

pub const PLAYER_BULLET_W: f32 = 4.0;
pub const PLAYER_BULLET_H: f32 = 10.0;
/// Rows travelled upward per frame.
pub const PLAYER_BULLET_SPEED: f32 = 7.0;

pub const ENEMY_BULLET_W: f32 = 4.0;
pub const ENEMY_BULLET_H: f32 = 10.0;
/// Rows travelled downward per frame.
pub const ENEMY_BULLET_SPEED: f32 = 4.0;

// ── Swarm layout ──────────────────────────────────────────────────────────────

pub const SWARM_COLUMNS: usize = 8;
pub const SWARM_ROWS: usize = 8;
pub const SWARM_SPACING: f32 = 45.0;
pub const SWARM_TOP: f32 = 20.0;

/// Build the starting 8×8 swarm.
///
/// Enemies are emitted column by column, so the first element sits in the
/// leftmost column and the last one in the rightmost.  Border detection
/// relies on that ordering, and the swarm is only ever filtered afterwards.
pub fn enemy_grid() -> Vec<Enemy> {
    (0..SWARM_COLUMNS)
        .flat_map(|col| {
            (0..SWARM_ROWS).map(move |row| {
                Enemy::new(
                    SWARM_SPACING * col as f32,
                    SWARM_TOP + SWARM_SPACING * row as f32,
                )
            })
        })
        .collect()
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Horizontal intent for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Still,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Still => 0.0,
            Direction::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    x: f32,
    y: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_START_X, PLAYER_START_Y)
    }
}

impl Player {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn w(&self) -> f32 {
        PLAYER_W
    }

    pub fn h(&self) -> f32 {
        PLAYER_H
    }

    /// Resolve held keys into a direction.  Left is checked first, and a
    /// direction only fires while there is room to move that way.
    pub fn direction(&self, left: bool, right: bool, canvas_width: f32) -> Direction {
        if left && self.x > 0.0 {
            Direction::Left
        } else if right && self.x < canvas_width - PLAYER_W {
            Direction::Right
        } else {
            Direction::Still
        }
    }

    /// Step horizontally, clamped to `[0, canvas_width - w]`.
    pub fn move_to(&self, direction: Direction, speed: f32, canvas_width: f32) -> Self {
        let max_x = (canvas_width - PLAYER_W).max(0.0);
        let x = (self.x + direction.sign() * speed).clamp(0.0, max_x);
        self.with_field(BodyField::X(x))
    }

    /// The player has no momentum; advancing re-applies the current position.
    pub fn advance(&self) -> Self {
        *self
    }

    /// Spawn point for a new shot: horizontal centre, top edge.
    pub fn muzzle(&self) -> (f32, f32) {
        (self.x + PLAYER_W / 2.0, self.y)
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    x: f32,
    y: f32,
}

impl Enemy {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn w(&self) -> f32 {
        ENEMY_W
    }

    pub fn h(&self) -> f32 {
        ENEMY_H
    }

    /// Lock-step horizontal move with the rest of the swarm.
    pub fn move_by(&self, velocity_x: f32) -> Self {
        self.with_field(BodyField::X(self.x + velocity_x))
    }

    /// Drop toward the player after the swarm touches a border.
    pub fn drop_by(&self, step_y: f32) -> Self {
        self.with_field(BodyField::Y(self.y + step_y))
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerBullet {
    x: f32,
    y: f32,
}

impl PlayerBullet {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn advance(&self) -> Self {
        self.with_field(BodyField::Y(self.y - PLAYER_BULLET_SPEED))
    }

    /// Entirely above the top edge of the canvas.
    pub fn is_off_screen(&self) -> bool {
        self.y + PLAYER_BULLET_H < 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    x: f32,
    y: f32,
}

impl EnemyBullet {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn advance(&self) -> Self {
        self.with_field(BodyField::Y(self.y + ENEMY_BULLET_SPEED))
    }

    /// Entirely below the bottom edge of a canvas `canvas_height` tall.
    pub fn is_off_screen(&self, canvas_height: f32) -> bool {
        self.y > canvas_height
    }
}

// ── Shared body behaviour ─────────────────────────────────────────────────────

macro_rules! body {
    ($kind:ty, $w:expr, $h:expr) => {
        impl Bounded for $kind {
            fn bounds(&self) -> Rect {
                Rect::new(self.x, self.y, $w, $h)
            }
        }

        impl WithFields for $kind {
            type Field = BodyField;

            fn with_field(&self, field: BodyField) -> Self {
                match field {
                    BodyField::X(x) => Self { x, ..*self },
                    BodyField::Y(y) => Self { y, ..*self },
                }
            }
        }
    };
}

body!(Player, PLAYER_W, PLAYER_H);
body!(Enemy, ENEMY_W, ENEMY_H);
body!(PlayerBullet, PLAYER_BULLET_W, PLAYER_BULLET_H);
body!(EnemyBullet, ENEMY_BULLET_W, ENEMY_BULLET_H);
