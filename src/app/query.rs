//! Debounced filter query.
//!
//! Keystrokes edit the input right away, the applied query only follows once typing has
//! paused for [QueryState::DEBOUNCE]. Views filter against the applied query.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct QueryState {
    input: String,
    applied: String,
    debounce: Option<Instant>,
}

impl QueryState {
    pub const DEBOUNCE: Duration = Duration::from_millis(200);

    // Getters / Accessors

    /// What the user has typed so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The query views filter against.
    pub fn applied(&self) -> &str {
        &self.applied
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_some()
    }

    pub fn set_debounce(&mut self, delay: Duration) {
        self.debounce = Some(Instant::now() + delay);
    }

    pub fn push(&mut self, c: char) {
        self.input.push(c);
        self.set_debounce(Self::DEBOUNCE);
    }

    pub fn backspace(&mut self) {
        if self.input.pop().is_some() {
            self.set_debounce(Self::DEBOUNCE);
        }
    }

    pub fn set_input(&mut self, text: &str) {
        self.input.clear();
        self.input.push_str(text);
        self.set_debounce(Self::DEBOUNCE);
    }

    /// Applies the input once the quiet period has passed.
    ///
    /// Returns the new query if it differs from the one applied before.
    pub fn take_query(&mut self) -> Option<String> {
        self.take_query_at(Instant::now())
    }

    pub fn take_query_at(&mut self, now: Instant) -> Option<String> {
        let until = self.debounce?;
        if now < until {
            return None;
        }
        self.flush()
    }

    /// Applies the input immediately.
    pub fn flush(&mut self) -> Option<String> {
        self.debounce = None;
        if self.input == self.applied {
            return None;
        }
        self.applied.clear();
        self.applied.push_str(&self.input);
        Some(self.applied.clone())
    }

    /// Clears input and applied query at once.
    pub fn reset(&mut self) {
        self.input.clear();
        self.applied.clear();
        self.debounce = None;
    }
}
