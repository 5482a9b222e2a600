//! Keyword interpreter: classifies free text into an [`Intent`].
//!
//! Text is lowercased and split into alphanumeric word tokens. Categories are
//! tried in a fixed order (lights, media, scenes, status) and the first one
//! whose vocabulary appears decides the outcome, even when no sub-command
//! follows.

use hestia_domain::color::Color;
use hestia_domain::device::Level;
use hestia_domain::intent::Intent;
use hestia_domain::scene::{LightAction, MediaAction};

const LIGHT_WORDS: &[&str] = &["light", "lights", "lamp", "lamps", "bulb", "bulbs"];
const BRIGHTNESS_WORDS: &[&str] = &["dim", "brightness", "bright", "brighten", "dimmer"];

const MEDIA_WORDS: &[&str] = &["music", "play", "song", "audio", "sound", "volume"];
const PLAY_WORDS: &[&str] = &["play", "start", "resume"];
const PAUSE_WORDS: &[&str] = &["pause", "stop"];

const SCENE_WORDS: &[&str] = &["scene", "mood", "setting", "mode"];
const SCENE_SYNONYMS: &[(&[&str], &str)] = &[
    (&["movie", "cinema"], "movie_mode"),
    (&["relax", "chill"], "relax_mode"),
    (&["work", "focus"], "work_mode"),
];

const STATUS_WORDS: &[&str] = &["status", "devices", "home"];

/// Level used when a brightness or volume request names no number.
const DEFAULT_LEVEL: i64 = 50;

struct Tokens(Vec<String>);

impl Tokens {
    fn new(text: &str) -> Self {
        Self(
            text.split(|c: char| !c.is_alphanumeric())
                .filter(|word| !word.is_empty())
                .map(str::to_lowercase)
                .collect(),
        )
    }

    fn has(&self, word: &str) -> bool {
        self.0.iter().any(|token| token == word)
    }

    fn any(&self, words: &[&str]) -> bool {
        words.iter().any(|word| self.has(word))
    }

    /// First run of ASCII digits anywhere in the text, clamped to a
    /// percentage. Runs too long for an `i64` saturate at the maximum.
    fn first_number(&self) -> Option<Level> {
        self.0.iter().find_map(|token| {
            let start = token.find(|c: char| c.is_ascii_digit())?;
            let digits = &token[start..];
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            Some(
                digits[..end]
                    .parse::<i64>()
                    .map_or(Level::MAX, Level::clamped),
            )
        })
    }

    fn level(&self) -> Level {
        self.first_number()
            .unwrap_or_else(|| Level::clamped(DEFAULT_LEVEL))
    }

    fn color(&self) -> Option<Color> {
        self.0.iter().find_map(|token| token.parse().ok())
    }
}

/// Classify `text`. `None` means the text is not a home command; this
/// function never fails.
#[must_use]
pub fn interpret(text: &str) -> Option<Intent> {
    let tokens = Tokens::new(text);

    let intent = if tokens.any(LIGHT_WORDS) {
        light(&tokens).map(Intent::Light)
    } else if tokens.any(MEDIA_WORDS) {
        media(&tokens).map(Intent::Media)
    } else if tokens.any(SCENE_WORDS) {
        scene(&tokens).map(|name| Intent::Scene(name.to_string()))
    } else if tokens.any(STATUS_WORDS) {
        Some(Intent::Status)
    } else {
        None
    };

    tracing::debug!(?intent, "command interpreted");
    intent
}

fn light(tokens: &Tokens) -> Option<LightAction> {
    if tokens.has("on") {
        Some(LightAction::On)
    } else if tokens.has("off") {
        Some(LightAction::Off)
    } else if tokens.any(BRIGHTNESS_WORDS) {
        Some(LightAction::Brightness(tokens.level()))
    } else {
        tokens.color().map(LightAction::Color)
    }
}

fn media(tokens: &Tokens) -> Option<MediaAction> {
    if tokens.any(PLAY_WORDS) {
        Some(MediaAction::Play)
    } else if tokens.any(PAUSE_WORDS) {
        Some(MediaAction::Pause)
    } else if tokens.has("volume") {
        Some(MediaAction::Volume(tokens.level()))
    } else {
        None
    }
}

fn scene(tokens: &Tokens) -> Option<&'static str> {
    SCENE_SYNONYMS
        .iter()
        .find(|(words, _)| tokens.any(words))
        .map(|(_, name)| *name)
}
