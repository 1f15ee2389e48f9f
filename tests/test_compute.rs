use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use swarm_shooter::compute::*;
use swarm_shooter::effects::{STATUS_LOSE, STATUS_WIN};
use swarm_shooter::entities::{Enemy, EnemyBullet, Player, PlayerBullet};
use swarm_shooter::{Canvas, Effect, GameArgs, GameConfig, GameState, Keys, Outcome, Sound};

fn args() -> GameArgs {
    GameArgs::new(Canvas::default())
}

/// Rolls just under 100 every time, so the swarm never fires.
fn quiet_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Rolls 0 every time: the swarm fires every frame from index 0.
fn firing_rng() -> StepRng {
    StepRng::new(0, 0)
}

/// Two invaders parked far from the player's line of fire.
fn parked_swarm() -> Vec<Enemy> {
    vec![Enemy::new(0.0, 20.0), Enemy::new(40.0, 20.0)]
}

fn still() -> Keys {
    Keys::default()
}

fn shoot() -> Keys {
    Keys { shoot: true, ..Keys::default() }
}

// ── Player action ─────────────────────────────────────────────────────────────

#[test]
fn left_and_right_move_the_player() {
    let s = GameState::new(args());
    let left = s.step(&Keys { left: true, ..still() }, &mut quiet_rng()).state;
    let right = s.step(&Keys { right: true, ..still() }, &mut quiet_rng()).state;
    assert_eq!(left.player().map(|p| p.x()), Some(279.0));
    assert_eq!(right.player().map(|p| p.x()), Some(289.0));
}

#[test]
fn player_stays_inside_canvas() {
    let s = GameState::new(GameArgs {
        player: Some(Player::new(566.0, 550.0)),
        ..args()
    });
    let s = s.step(&Keys { right: true, ..still() }, &mut quiet_rng()).state;
    assert_eq!(s.player().map(|p| p.x()), Some(568.0));
    let s = s.step(&Keys { right: true, ..still() }, &mut quiet_rng()).state;
    assert_eq!(s.player().map(|p| p.x()), Some(568.0));
}

#[test]
fn shooting_spawns_bullet_and_sound() {
    let s = GameState::new(GameArgs {
        enemies: Some(parked_swarm()),
        ..args()
    });
    let step = s.step(&shoot(), &mut quiet_rng());
    // Spawned at the muzzle (300, 550) then advanced in the same frame.
    assert_eq!(step.state.player_bullets(), &[PlayerBullet::new(300.0, 543.0)]);
    assert_eq!(step.state.player_bullet_cooldown(), 40);
    assert_eq!(step.effects, vec![Effect::PlaySound(Sound::PlayerShoot)]);
}

#[test]
fn cooldown_counts_down_while_fire_is_held() {
    let s = GameState::new(GameArgs {
        enemies: Some(parked_swarm()),
        player_bullet_cooldown: Some(5),
        ..args()
    });
    let step = s.step(&shoot(), &mut quiet_rng());
    assert_eq!(step.state.player_bullet_cooldown(), 4);
    assert!(step.state.player_bullets().is_empty());
    assert!(step.effects.is_empty());
}

#[test]
fn cooldown_does_not_tick_without_fire() {
    let s = GameState::new(GameArgs {
        enemies: Some(parked_swarm()),
        player_bullet_cooldown: Some(5),
        ..args()
    });
    let s = s.step(&still(), &mut quiet_rng()).state;
    assert_eq!(s.player_bullet_cooldown(), 5);
}

#[test]
fn holding_fire_shoots_once_every_period_plus_one_frames() {
    let mut s = GameState::new(GameArgs {
        enemies: Some(parked_swarm()),
        swarm_velocity_x: Some(0.0),
        player_final_bullet_cooldown: Some(3),
        ..args()
    });
    let mut fired_on = Vec::new();
    for frame in 0..12 {
        let step = s.step(&shoot(), &mut quiet_rng());
        if step.effects.contains(&Effect::PlaySound(Sound::PlayerShoot)) {
            fired_on.push(frame);
        }
        s = step.state;
    }
    assert_eq!(fired_on, vec![0, 4, 8]);
    assert_eq!(s.player_bullets().len(), 3);
}

// ── Body advance ──────────────────────────────────────────────────────────────

#[test]
fn bodies_advance_one_frame() {
    let s = GameState::new(GameArgs {
        enemies: Some(parked_swarm()),
        player_bullets: Some(vec![PlayerBullet::new(300.0, 300.0)]),
        enemy_bullets: Some(vec![EnemyBullet::new(100.0, 100.0)]),
        ..args()
    });
    let s = update_bodies(&s);
    assert_eq!(s.player_bullets(), &[PlayerBullet::new(300.0, 293.0)]);
    assert_eq!(s.enemy_bullets(), &[EnemyBullet::new(100.0, 104.0)]);
    assert_eq!(s.enemies(), &[Enemy::new(2.0, 20.0), Enemy::new(42.0, 20.0)]);
    assert_eq!(s.player(), Some(&Player::default()));
}

#[test]
fn bullets_leaving_the_canvas_are_dropped() {
    let s = GameState::new(GameArgs {
        enemies: Some(parked_swarm()),
        player_bullets: Some(vec![PlayerBullet::new(300.0, 2.0), PlayerBullet::new(300.0, -4.0)]),
        enemy_bullets: Some(vec![EnemyBullet::new(100.0, 596.0), EnemyBullet::new(100.0, 598.0)]),
        ..args()
    });
    let s = update_bodies(&s);
    assert_eq!(s.player_bullets(), &[PlayerBullet::new(300.0, -5.0)]);
    assert_eq!(s.enemy_bullets(), &[EnemyBullet::new(100.0, 600.0)]);
}

// ── Swarm border ──────────────────────────────────────────────────────────────

#[test]
fn swarm_bounces_off_right_border() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(500.0, 100.0), Enemy::new(569.0, 100.0)]),
        ..args()
    });
    let step = s.step(&still(), &mut quiet_rng());
    assert_eq!(step.state.swarm_velocity_x(), -2.0);
    assert_eq!(
        step.state.enemies(),
        &[Enemy::new(502.0, 110.0), Enemy::new(571.0, 110.0)]
    );
    assert!(step.state.game_running());
}

#[test]
fn swarm_bounces_off_left_border() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(1.0, 100.0), Enemy::new(50.0, 100.0)]),
        swarm_velocity_x: Some(-2.0),
        ..args()
    });
    let s = s.step(&still(), &mut quiet_rng()).state;
    assert_eq!(s.swarm_velocity_x(), 2.0);
    assert_eq!(s.enemies(), &[Enemy::new(-1.0, 110.0), Enemy::new(48.0, 110.0)]);
}

#[test]
fn no_bounce_inside_the_canvas() {
    let s = GameState::new(args());
    let s = s.step(&still(), &mut quiet_rng()).state;
    assert_eq!(s.swarm_velocity_x(), 2.0);
    assert_eq!(s.enemies()[0], Enemy::new(2.0, 20.0));
}

#[test]
fn empty_swarm_border_check_is_a_no_op() {
    let s = GameState::new(GameArgs {
        enemies: Some(Vec::new()),
        ..args()
    });
    let mut effects = Vec::new();
    let after = enemy_collision_with_border(&s, &mut effects);
    assert_eq!(after, s);
    assert!(effects.is_empty());
}

#[test]
fn breach_after_bounce_loses() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(1.0, 495.0), Enemy::new(100.0, 495.0)]),
        swarm_velocity_x: Some(-2.0),
        ..args()
    });
    let step = s.step(&still(), &mut quiet_rng());
    assert!(!step.state.game_running());
    assert!(step.state.player().is_none());
    assert!(step.state.enemies().is_empty());
    assert_eq!(step.state.outcome(), Outcome::Lost);
    assert_eq!(step.effects, vec![Effect::SetStatus(STATUS_LOSE.to_string())]);
}

#[test]
fn enemy_below_kill_zone_loses_without_bounce() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(100.0, 501.0), Enemy::new(200.0, 100.0)]),
        ..args()
    });
    let step = s.step(&still(), &mut quiet_rng());
    assert_eq!(step.state.outcome(), Outcome::Lost);
}

#[test]
fn enemy_on_kill_zone_line_is_safe() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(100.0, 500.0), Enemy::new(200.0, 100.0)]),
        ..args()
    });
    let step = s.step(&still(), &mut quiet_rng());
    assert!(step.state.game_running());
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

#[test]
fn swarm_fires_from_selected_enemy() {
    let s = GameState::new(args());
    let step = s.step(&still(), &mut firing_rng());
    // enemies[0] has already moved 2 to the right this frame.
    assert_eq!(step.state.enemy_bullets(), &[EnemyBullet::new(2.0, 20.0)]);
    assert_eq!(step.effects, vec![Effect::PlaySound(Sound::InvaderShoot)]);
}

#[test]
fn last_enemy_is_never_selected() {
    let swarm = vec![
        Enemy::new(100.0, 20.0),
        Enemy::new(200.0, 20.0),
        Enemy::new(300.0, 20.0),
    ];
    let s = GameState::new(GameArgs {
        enemies: Some(swarm.clone()),
        config: GameConfig {
            enemy_fire_chance_percent: 100.0,
            ..GameConfig::default()
        },
        ..args()
    });
    let mut rng = StdRng::seed_from_u64(42);
    let mut shooters = Vec::new();
    for _ in 0..200 {
        let mut effects = Vec::new();
        let fired = enemy_shoots_ai(&s, &mut rng, &mut effects);
        let bullet = fired.enemy_bullets()[0];
        shooters.push(bullet.x());
    }
    assert!(shooters.contains(&100.0));
    assert!(shooters.contains(&200.0));
    assert!(!shooters.contains(&300.0));
}

#[test]
fn lone_survivor_never_fires() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(100.0, 20.0)]),
        ..args()
    });
    let step = s.step(&still(), &mut firing_rng());
    assert!(step.state.enemy_bullets().is_empty());
    assert!(step.effects.is_empty());
}

#[test]
fn quiet_roll_does_not_fire() {
    let s = GameState::new(args());
    let step = s.step(&still(), &mut quiet_rng());
    assert!(step.state.enemy_bullets().is_empty());
}

#[test]
fn seeded_fire_rate_is_about_one_percent() {
    let s = GameState::new(args());
    let mut rng = StdRng::seed_from_u64(7);
    let mut shots = 0;
    for _ in 0..10_000 {
        let mut effects = Vec::new();
        let _ = enemy_shoots_ai(&s, &mut rng, &mut effects);
        shots += effects.len();
    }
    assert!((50..=200).contains(&shots), "shots = {shots}");
}

// ── Bullet collisions ─────────────────────────────────────────────────────────

#[test]
fn last_enemy_shot_wins() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(100.0, 100.0)]),
        player_bullets: Some(vec![PlayerBullet::new(110.0, 135.0)]),
        ..args()
    });
    let step = s.step(&still(), &mut quiet_rng());
    assert!(!step.state.game_running());
    assert!(step.state.enemies().is_empty());
    assert!(step.state.player_bullets().is_empty());
    assert!(step.state.enemy_bullets().is_empty());
    assert!(step.state.player().is_some());
    assert_eq!(step.state.outcome(), Outcome::Won);
    assert_eq!(step.effects, vec![Effect::SetStatus(STATUS_WIN.to_string())]);
}

#[test]
fn enemy_bullet_on_player_loses() {
    let s = GameState::new(GameArgs {
        enemy_bullets: Some(vec![EnemyBullet::new(290.0, 548.0)]),
        ..args()
    });
    let step = s.step(&still(), &mut quiet_rng());
    assert!(!step.state.game_running());
    assert!(step.state.player().is_none());
    assert!(step.state.enemies().is_empty());
    assert_eq!(step.effects, vec![Effect::SetStatus(STATUS_LOSE.to_string())]);
}

#[test]
fn hit_removes_bullet_and_enemy() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(100.0, 100.0), Enemy::new(300.0, 100.0)]),
        player_bullets: Some(vec![PlayerBullet::new(110.0, 135.0), PlayerBullet::new(500.0, 300.0)]),
        ..args()
    });
    let s = s.step(&still(), &mut quiet_rng()).state;
    assert!(s.game_running());
    assert_eq!(s.enemies(), &[Enemy::new(302.0, 100.0)]);
    assert_eq!(s.player_bullets(), &[PlayerBullet::new(500.0, 293.0)]);
}

#[test]
fn two_bullets_on_one_enemy_remove_it_once() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![Enemy::new(100.0, 100.0), Enemy::new(300.0, 100.0)]),
        player_bullets: Some(vec![PlayerBullet::new(105.0, 135.0), PlayerBullet::new(115.0, 135.0)]),
        ..args()
    });
    let s = s.step(&still(), &mut quiet_rng()).state;
    assert_eq!(s.enemies(), &[Enemy::new(302.0, 100.0)]);
    assert!(s.player_bullets().is_empty());
}

#[test]
fn bullet_claims_only_the_first_enemy_it_overlaps() {
    let s = GameState::new(GameArgs {
        enemies: Some(vec![
            Enemy::new(100.0, 100.0),
            Enemy::new(110.0, 100.0),
            Enemy::new(400.0, 100.0),
        ]),
        player_bullets: Some(vec![PlayerBullet::new(125.0, 135.0)]),
        ..args()
    });
    let s = s.step(&still(), &mut quiet_rng()).state;
    assert_eq!(s.enemies(), &[Enemy::new(112.0, 100.0), Enemy::new(402.0, 100.0)]);
    assert!(s.player_bullets().is_empty());
}

#[test]
fn bullet_collision_is_inert_once_ended() {
    let s = GameState::new(GameArgs {
        game_running: Some(false),
        enemy_bullets: Some(vec![EnemyBullet::new(290.0, 552.0)]),
        ..args()
    });
    let mut effects = Vec::new();
    assert_eq!(bullet_collision(&s, &mut effects), s);
    assert!(effects.is_empty());
}

#[test]
fn enemy_fire_is_inert_once_ended() {
    let s = GameState::new(GameArgs {
        game_running: Some(false),
        enemies: Some(vec![
            Enemy::new(100.0, 20.0),
            Enemy::new(200.0, 20.0),
            Enemy::new(300.0, 20.0),
        ]),
        ..args()
    });
    let mut effects = Vec::new();
    let after = enemy_shoots_ai(&s, &mut firing_rng(), &mut effects);
    assert_eq!(after, s);
    assert!(after.enemy_bullets().is_empty());
    assert!(effects.is_empty());
}

// ── Step entry point ──────────────────────────────────────────────────────────

#[test]
fn ended_game_is_returned_unchanged() {
    let s = GameState::new(GameArgs {
        enemy_bullets: Some(vec![EnemyBullet::new(290.0, 548.0)]),
        ..args()
    });
    let ended = s.step(&still(), &mut quiet_rng()).state;
    let step = ended.step(&Keys { left: true, shoot: true, ..still() }, &mut firing_rng());
    assert_eq!(step.state, ended);
    assert!(step.effects.is_empty());
}

#[test]
fn restart_rebuilds_from_original_args() {
    let original = GameArgs {
        enemy_bullets: Some(vec![EnemyBullet::new(290.0, 548.0)]),
        ..args()
    };
    let ended = GameState::new(original.clone()).step(&still(), &mut quiet_rng()).state;
    assert!(!ended.game_running());

    let restart = Keys { restart: true, ..still() };
    let step = ended.step(&restart, &mut quiet_rng());
    assert_eq!(step.state, GameState::new(original));
    assert!(step.effects.is_empty());
}

#[test]
fn restart_while_running_ignores_other_keys() {
    let s = GameState::new(args());
    let moved = s.step(&Keys { right: true, ..still() }, &mut quiet_rng()).state;
    let keys = Keys { restart: true, right: true, shoot: true, ..still() };
    let step = moved.step(&keys, &mut firing_rng());
    assert_eq!(step.state, s);
    assert!(step.effects.is_empty());
}

#[test]
fn idle_frames_only_move_bodies() {
    let mut s = GameState::new(GameArgs {
        enemies: Some(parked_swarm()),
        ..args()
    });
    for frame in 1..=20 {
        let step = s.step(&still(), &mut quiet_rng());
        assert!(step.effects.is_empty());
        assert!(step.state.game_running());
        assert_eq!(step.state.player(), s.player());
        assert_eq!(step.state.player_bullet_cooldown(), 0);
        assert_eq!(step.state.enemies()[0].x(), 2.0 * frame as f32);
        s = step.state;
    }
}

#[test]
fn step_does_not_mutate_previous_state() {
    let s = GameState::new(args());
    let snapshot = s.clone();
    let _ = s.step(&shoot(), &mut firing_rng());
    assert_eq!(s, snapshot);
}
