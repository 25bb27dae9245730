//! Typing Effect
//!
//! Cosmetic progressive reveal of text, as if it were being typed, with a
//! blinking block cursor. Everything here is a pure function of elapsed
//! wall-clock time: nothing sleeps and nothing gates dispatch, so a renderer
//! can call it every frame or skip it entirely.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Glyph shown while the cursor is "on"
pub const CURSOR_GLYPH: &str = "█";

/// Prefix of `full_text` that has been "typed" after `elapsed`
///
/// Reveals `round(elapsed * chars_per_second)` characters, clamped to the
/// text length. A non-finite or non-positive speed disables the effect and
/// returns the whole text.
pub fn reveal(full_text: &str, elapsed: Duration, chars_per_second: f64) -> String {
    if !chars_per_second.is_finite() || chars_per_second <= 0.0 {
        return full_text.to_string();
    }

    let wanted = (elapsed.as_secs_f64() * chars_per_second).round();
    if wanted <= 0.0 {
        return String::new();
    }

    let count = if wanted >= usize::MAX as f64 {
        usize::MAX
    } else {
        wanted as usize
    };

    match full_text.char_indices().nth(count) {
        Some((byte_index, _)) => full_text[..byte_index].to_string(),
        None => full_text.to_string(),
    }
}

/// Block cursor on even whole seconds, nothing on odd ones
pub fn cursor_glyph(now: SystemTime) -> &'static str {
    let secs = now
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_secs())
        .unwrap_or(0);
    if secs % 2 == 0 {
        CURSOR_GLYPH
    } else {
        ""
    }
}

/// One reveal session, anchored at the moment it was created
#[derive(Debug, Clone, Copy)]
pub struct TypingEffect {
    started_at: Instant,
    chars_per_second: f64,
}

impl TypingEffect {
    /// Start revealing now
    pub fn new(chars_per_second: f64) -> Self {
        Self::starting_at(Instant::now(), chars_per_second)
    }

    /// Start revealing from a given instant
    pub fn starting_at(started_at: Instant, chars_per_second: f64) -> Self {
        Self {
            started_at,
            chars_per_second,
        }
    }

    /// Build from a per-character delay, like "50 ms per char"
    pub fn from_char_interval(per_char: Duration) -> Self {
        let secs = per_char.as_secs_f64();
        let chars_per_second = if secs > 0.0 { 1.0 / secs } else { f64::INFINITY };
        Self::new(chars_per_second)
    }

    /// 50 ms per character, used for command text
    pub fn slow() -> Self {
        Self::from_char_interval(Duration::from_millis(50))
    }

    /// 30 ms per character, used for explanations
    pub fn fast() -> Self {
        Self::from_char_interval(Duration::from_millis(30))
    }

    pub fn chars_per_second(&self) -> f64 {
        self.chars_per_second
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Revealed prefix at `now`
    pub fn visible(&self, full_text: &str, now: Instant) -> String {
        reveal(full_text, self.elapsed_at(now), self.chars_per_second)
    }

    /// Revealed prefix followed by the blinking cursor
    pub fn frame(&self, full_text: &str, now: Instant, wall_clock: SystemTime) -> String {
        let mut shown = self.visible(full_text, now);
        shown.push_str(cursor_glyph(wall_clock));
        shown
    }

    /// Whether the whole text is visible at `now`
    pub fn is_complete(&self, full_text: &str, now: Instant) -> bool {
        self.visible(full_text, now).len() == full_text.len()
    }
}
