/// Side effects requested by a frame, and the collaborators that carry them out.
///
/// The pipeline never touches audio or the status display directly.  It
/// records what should happen as [`Effect`] values; the frame driver hands
/// them to an [`Outputs`] after swapping in the new state.

/// Sound cues the engine can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    /// The player fired.
    PlayerShoot,
    /// An invader fired.
    InvaderShoot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    PlaySound(Sound),
    SetStatus(String),
}

pub const STATUS_WIN: &str = "You win";
pub const STATUS_LOSE: &str = "You lose";

/// Something that can be played without arguments, fire-and-forget.
pub trait Playable {
    fn play(&self);
}

/// A text display with a single settable line.
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

/// The external collaborators a running game talks to.
pub struct Outputs {
    pub player_shoot_sound: Box<dyn Playable>,
    pub invader_shoot_sound: Box<dyn Playable>,
    pub status: Box<dyn TextSink>,
}

impl Outputs {
    /// Carry out effects in the order they were recorded.
    pub fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::PlaySound(Sound::PlayerShoot) => self.player_shoot_sound.play(),
                Effect::PlaySound(Sound::InvaderShoot) => self.invader_shoot_sound.play(),
                Effect::SetStatus(text) => self.status.set_text(text),
            }
        }
    }
}
