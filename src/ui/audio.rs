//! Sound cues

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// Sound effect ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Short warning chirp (infiltration)
    Alert,
    /// Victory jingle
    Fanfare,
}

/// Fire-and-forget sound playback
pub trait AudioCue: Send {
    fn play(&self, sound: Sound);
}

/// Records played sounds instead of mixing audio
#[derive(Debug, Clone, Default)]
pub struct SoundLog {
    played: Arc<Mutex<Vec<Sound>>>,
}

impl SoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds played so far, oldest first
    pub fn played(&self) -> Vec<Sound> {
        self.played.lock().clone()
    }

    /// How many times `sound` was played
    pub fn count(&self, sound: Sound) -> usize {
        self.played.lock().iter().filter(|s| **s == sound).count()
    }
}

impl AudioCue for SoundLog {
    fn play(&self, sound: Sound) {
        debug!("sound cue {:?}", sound);
        self.played.lock().push(sound);
    }
}
