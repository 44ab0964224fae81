//! Canned reply pools and the random picker that chooses from them.
//!
//! Randomness is injectable: seed the picker for deterministic tests.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const PHOTO_RESPONSES: &[&str] = &[
    "Cute photo, but I need some claims to fact-check! Send me the tea ☕",
    "Pretty picture, but where are the questionable health facts? 💅",
    "I see the aesthetic but not the misinformation. Try again! 📸",
    "Visual content with no text to roast? My talents are wasted! 🎭",
];

pub const VIDEO_RESPONSES: &[&str] = &[
    "Your Reel is vibing but I need captions to roast! Add some text 🎬",
    "Great moves, but where are the dubious health claims? 💃",
    "I can't fact-check dance moves (yet). Send me some wild claims! 🕺",
    "Video looks fire but my expertise is in roasting misinformation, not content! 🔥",
];

pub const EMPTY_RESPONSES: &[&str] = &[
    "Did you send me the void? I need actual content to fact-check! ⚫",
    "Your message is emptier than a juice cleanse promise. Try again! 🤷‍♀️",
    "I got nothing because you sent nothing. Send me some hot takes! 🔥",
    "Error 404: Content not found. Please try again with actual text! 💻",
];

/// Uniform choice over a fixed pool.
pub struct Picker {
    rng: Mutex<StdRng>,
}

impl Default for Picker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Picker {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Picks one entry. Pools are non-empty constants; an empty pool yields "".
    pub fn pick(&self, pool: &[&'static str]) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pool.choose(&mut *rng).copied().unwrap_or_default()
    }
}
