use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use swarm_shooter::{
    Canvas, GameArgs, GameConfig, GameState, Keys, Outcome, Outputs, Playable, TextSink,
};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key counts as held if its last press/repeat event arrived within this
/// many frames.  Terminals without release events rely on OS key-repeat
/// (≥ 15 Hz) refreshing the key before it expires.
const HOLD_WINDOW: u64 = 8;

const CONFIG_ENV: &str = "SWARM_SHOOTER_CONFIG";
const SEED_ENV: &str = "SWARM_SHOOTER_SEED";

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Both sound cues ring the terminal bell.  Playing only marks the bell;
/// the frame loop queues it with the rest of the frame's output.
#[derive(Clone, Default)]
struct Bell(Rc<Cell<bool>>);

impl Bell {
    /// True if the bell was played since the last call.
    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

impl Playable for Bell {
    fn play(&self) {
        self.0.set(true);
    }
}

/// Status text shared with the frame loop, which draws it every frame.
#[derive(Clone, Default)]
struct StatusLine(Rc<RefCell<String>>);

impl StatusLine {
    fn text(&self) -> String {
        self.0.borrow().clone()
    }
}

impl TextSink for StatusLine {
    fn set_text(&mut self, text: &str) {
        *self.0.borrow_mut() = text.to_string();
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> GameConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return GameConfig::default();
    };
    match GameConfig::load(&path) {
        Ok(config) => {
            log::info!("loaded config from {path}");
            config
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            GameConfig::default()
        }
    }
}

fn seeded_rng() -> Pcg32 {
    match std::env::var(SEED_ENV).ok().and_then(|s| s.trim().parse().ok()) {
        Some(seed) => {
            log::info!("using seed {seed}");
            Pcg32::seed_from_u64(seed)
        }
        None => Pcg32::from_entropy(),
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Input model: every key's last press/repeat frame is recorded, and each
/// frame the fresh ones are folded into a single `Keys` snapshot, so moving
/// and shooting can be held together.  Release events, where the terminal
/// reports them, drop the key immediately.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut state: GameState,
) -> std::io::Result<()> {
    let mut rng = seeded_rng();
    let bell = Bell::default();
    let status = StatusLine::default();
    let mut outputs = Outputs {
        player_shoot_sound: Box::new(bell.clone()),
        invader_shoot_sound: Box::new(bell.clone()),
        status: Box::new(status.clone()),
    };

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let keys = Keys {
            left: any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ),
            right: any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ),
            shoot: is_held(&key_frame, &KeyCode::Char(' '), frame),
            restart: any_held(&key_frame, &[KeyCode::Char('r'), KeyCode::Char('R')], frame),
        };
        if keys.restart {
            // One restart per press, not one per held frame.
            key_frame.remove(&KeyCode::Char('r'));
            key_frame.remove(&KeyCode::Char('R'));
            outputs.status.set_text("");
        }

        let step = state.step(&keys, &mut rng);
        state = step.state;
        outputs.apply(&step.effects);

        if bell.take() {
            out.queue(Print('\x07'))?;
        }
        draw_status(out, &state, &status.text())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

/// Text HUD: counters on row 0, status message on row 1.
fn draw_status<W: Write>(out: &mut W, state: &GameState, status: &str) -> std::io::Result<()> {
    let player_x = state
        .player()
        .map(|p| format!("{:>5.0}", p.x()))
        .unwrap_or_else(|| "  ---".to_string());

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(format!(
        "Invaders:{:>3}  Shots:{:>3}  Incoming:{:>3}  Cooldown:{:>3}  Player x:{}",
        state.enemies().len(),
        state.player_bullets().len(),
        state.enemy_bullets().len(),
        state.player_bullet_cooldown(),
        player_x,
    )))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    let color = match state.outcome() {
        Outcome::Running => Color::White,
        Outcome::Won => Color::Green,
        Outcome::Lost => Color::Red,
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(status))?;

    out.queue(cursor::MoveTo(0, 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   R : Restart   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = GameArgs {
        config: load_config(),
        ..GameArgs::new(Canvas::default())
    };
    let state = GameState::new(args);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;
    out.execute(cursor::Hide)?;

    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits on input.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &rx, state);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
