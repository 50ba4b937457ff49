//! Overlay module to stack notifications on top of the workspace.
//!
//! Every backend failure and every finished export ends up here as a
//! [Overlay::Notification] that expires on its own.
//!
//! Is used throughout the ui modules and by the session.

use std::slice;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    /// How long a notification of this severity stays on screen.
    pub fn duration(&self) -> Duration {
        match self {
            Severity::Info => Duration::from_secs(3),
            Severity::Error => Duration::from_secs(7),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Notification {
        title: String,
        severity: Severity,
        until: Instant,
    },
}

impl Overlay {
    pub fn notification(title: impl Into<String>, severity: Severity) -> Self {
        Overlay::Notification {
            title: title.into(),
            severity,
            until: Instant::now() + severity.duration(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self {
            Overlay::Notification { until, .. } => now >= *until,
        }
    }
}

#[derive(Debug, Default)]
pub struct OverlayStack {
    overlays: Vec<Overlay>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self {
            overlays: Vec::new(),
        }
    }

    pub fn push(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    pub fn top(&self) -> Option<&Overlay> {
        self.overlays.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, Overlay> {
        self.overlays.iter()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    /// Drops expired overlays. Returns true if any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|o| !o.is_expired(now));
        before != self.overlays.len()
    }
}
