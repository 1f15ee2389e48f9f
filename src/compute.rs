/// The per-frame pipeline.
///
/// Every stage takes an immutable reference to the current `GameState`
/// and returns a brand-new one.  Randomness comes only from the injected
/// RNG, and audio/status requests are appended to an effect list instead of
/// being performed, so a whole frame can be replayed in a test.

use std::sync::Arc;

use rand::Rng;

use crate::collision::collide;
use crate::effects::{Effect, Sound, STATUS_LOSE, STATUS_WIN};
use crate::entities::{Enemy, EnemyBullet, PlayerBullet};
use crate::state::{GameState, Keys, StateField};
use crate::update::WithFields;

/// Result of advancing one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

impl GameState {
    /// Advance one frame.
    ///
    /// Restart input wins over everything and rebuilds the game from its
    /// original arguments.  A finished game is otherwise returned unchanged.
    pub fn step(&self, keys: &Keys, rng: &mut impl Rng) -> Step {
        if keys.restart {
            log::debug!("restart requested");
            return Step {
                state: self.restarted(),
                effects: Vec::new(),
            };
        }
        if !self.game_running() {
            return Step {
                state: self.clone(),
                effects: Vec::new(),
            };
        }
        let mut effects = Vec::new();
        let state = update_game_loop(self, keys, rng, &mut effects);
        Step { state, effects }
    }
}

/// Run the five stages in order, each consuming the previous stage's output.
pub fn update_game_loop(
    state: &GameState,
    keys: &Keys,
    rng: &mut impl Rng,
    effects: &mut Vec<Effect>,
) -> GameState {
    let state = player_action(state, keys, effects);
    let state = update_bodies(&state);
    let state = enemy_collision_with_border(&state, effects);
    let state = enemy_shoots_ai(&state, rng, effects);
    bullet_collision(&state, effects)
}

// ── 1. Player movement and fire ──────────────────────────────────────────────

pub fn player_action(state: &GameState, keys: &Keys, effects: &mut Vec<Effect>) -> GameState {
    let moved = update_player_movement(state, keys);
    if keys.shoot {
        player_shoots(&moved, effects)
    } else {
        moved
    }
}

pub fn update_player_movement(state: &GameState, keys: &Keys) -> GameState {
    let Some(player) = state.player() else {
        return state.clone();
    };
    let width = state.canvas().width;
    let direction = player.direction(keys.left, keys.right, width);
    let player = player.move_to(direction, state.config().player_speed, width);
    state.with_field(StateField::Player(Some(player)))
}

/// Fire if the cooldown has run out, otherwise count it down by one.
pub fn player_shoots(state: &GameState, effects: &mut Vec<Effect>) -> GameState {
    let Some(player) = state.player() else {
        return state.clone();
    };
    let counter = state.player_bullet_cooldown();
    if counter > 0 {
        return state.with_field(StateField::PlayerBulletCooldown(counter - 1));
    }

    let (x, y) = player.muzzle();
    let bullets: Arc<[PlayerBullet]> = state
        .player_bullets()
        .iter()
        .copied()
        .chain(std::iter::once(PlayerBullet::new(x, y)))
        .collect();
    log::trace!("player fired at ({x}, {y})");
    effects.push(Effect::PlaySound(Sound::PlayerShoot));
    state.with_fields([
        StateField::PlayerBullets(bullets),
        StateField::PlayerBulletCooldown(state.player_cooldown_period()),
    ])
}

// ── 2. Body advance ──────────────────────────────────────────────────────────

/// Move every body one frame and cull bullets that have left the canvas.
pub fn update_bodies(state: &GameState) -> GameState {
    let canvas_height = state.canvas().height;
    let velocity_x = state.swarm_velocity_x();

    let player_bullets: Arc<[PlayerBullet]> = state
        .player_bullets()
        .iter()
        .map(PlayerBullet::advance)
        .filter(|b| !b.is_off_screen())
        .collect();
    let enemy_bullets: Arc<[EnemyBullet]> = state
        .enemy_bullets()
        .iter()
        .map(EnemyBullet::advance)
        .filter(|b| !b.is_off_screen(canvas_height))
        .collect();
    let enemies: Arc<[Enemy]> = state
        .enemies()
        .iter()
        .map(|e| e.move_by(velocity_x))
        .collect();

    state.with_fields([
        StateField::PlayerBullets(player_bullets),
        StateField::EnemyBullets(enemy_bullets),
        StateField::Player(state.player().map(|p| p.advance())),
        StateField::Enemies(enemies),
    ])
}

// ── 3. Swarm border bounce and kill zone ─────────────────────────────────────

pub fn enemy_collision_with_border(state: &GameState, effects: &mut Vec<Effect>) -> GameState {
    let enemies = state.enemies();
    let (Some(leftmost), Some(rightmost)) = (enemies.first(), enemies.last()) else {
        return state.clone();
    };

    let config = state.config();
    let touches_border =
        leftmost.x() < 0.0 || rightmost.x() + rightmost.w() > state.canvas().width;

    let (velocity_x, enemies): (f32, Arc<[Enemy]>) = if touches_border {
        log::trace!("swarm bounced at x={}", leftmost.x());
        (
            -state.swarm_velocity_x(),
            enemies.iter().map(|e| e.drop_by(config.swarm_step_y)).collect(),
        )
    } else {
        (state.swarm_velocity_x(), state.shared_enemies())
    };

    if enemies.iter().any(|e| e.y() > config.kill_zone_y) {
        log::debug!("swarm reached the kill zone");
        return player_dies(state, effects);
    }

    state.with_fields([
        StateField::SwarmVelocityX(velocity_x),
        StateField::Enemies(enemies),
    ])
}

// ── 4. Enemy fire ────────────────────────────────────────────────────────────

/// Occasionally let a random invader fire.
///
/// The target is drawn from every enemy except the last one in the swarm,
/// so fewer than two survivors means nobody fires.
pub fn enemy_shoots_ai(
    state: &GameState,
    rng: &mut impl Rng,
    effects: &mut Vec<Effect>,
) -> GameState {
    if !state.game_running() {
        return state.clone();
    }
    let roll: f64 = rng.gen_range(0.0..100.0);
    if roll > state.config().enemy_fire_chance_percent {
        return state.clone();
    }
    let enemies = state.enemies();
    if enemies.len() < 2 {
        return state.clone();
    }
    let shooter = enemies[rng.gen_range(0..enemies.len() - 1)];
    let bullets: Arc<[EnemyBullet]> = state
        .enemy_bullets()
        .iter()
        .copied()
        .chain(std::iter::once(EnemyBullet::new(shooter.x(), shooter.y())))
        .collect();
    log::trace!("invader fired at ({}, {})", shooter.x(), shooter.y());
    effects.push(Effect::PlaySound(Sound::InvaderShoot));
    state.with_field(StateField::EnemyBullets(bullets))
}

// ── 5. Bullet hits ───────────────────────────────────────────────────────────

pub fn bullet_collision(state: &GameState, effects: &mut Vec<Effect>) -> GameState {
    if !state.game_running() {
        return state.clone();
    }
    let Some(player) = state.player() else {
        return state.clone();
    };
    if state.enemy_bullets().iter().any(|b| collide(b, player)) {
        log::debug!("player hit by enemy fire");
        return player_dies(state, effects);
    }

    // Each bullet claims the first enemy it overlaps, in swarm order.
    let enemies = state.enemies();
    let mut dead_enemies = vec![false; enemies.len()];
    let mut used_bullets = vec![false; state.player_bullets().len()];
    for (bi, bullet) in state.player_bullets().iter().enumerate() {
        if let Some(ei) = enemies.iter().position(|e| collide(e, bullet)) {
            dead_enemies[ei] = true;
            used_bullets[bi] = true;
        }
    }

    let player_bullets: Arc<[PlayerBullet]> = state
        .player_bullets()
        .iter()
        .zip(&used_bullets)
        .filter(|(_, used)| !**used)
        .map(|(b, _)| *b)
        .collect();
    let enemies: Arc<[Enemy]> = enemies
        .iter()
        .zip(&dead_enemies)
        .filter(|(_, dead)| !**dead)
        .map(|(e, _)| *e)
        .collect();

    if enemies.is_empty() {
        log::debug!("swarm destroyed");
        return player_wins(state, effects);
    }

    state.with_fields([
        StateField::PlayerBullets(player_bullets),
        StateField::Enemies(enemies),
    ])
}

// ── Terminal transitions ─────────────────────────────────────────────────────

fn cleared(state: &GameState) -> GameState {
    state.with_fields([
        StateField::GameRunning(false),
        StateField::Enemies(Vec::new().into()),
        StateField::PlayerBullets(Vec::new().into()),
        StateField::EnemyBullets(Vec::new().into()),
    ])
}

pub fn player_dies(state: &GameState, effects: &mut Vec<Effect>) -> GameState {
    effects.push(Effect::SetStatus(STATUS_LOSE.to_string()));
    cleared(state).with_field(StateField::Player(None))
}

pub fn player_wins(state: &GameState, effects: &mut Vec<Effect>) -> GameState {
    effects.push(Effect::SetStatus(STATUS_WIN.to_string()));
    cleared(state)
}
