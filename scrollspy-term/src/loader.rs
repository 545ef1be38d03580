//! Background section loading.
//!
//! Each request runs as its own tokio task and reports back over an unbounded
//! channel that the event loop selects on.

use std::time::Duration;

use log::{debug, trace};
use tokio::sync::mpsc;

const PARAGRAPHS: [&str; 6] = [
    "Observers are registered once per element and released on teardown.",
    "Scrolling moves the viewport; sections entering it start loading.",
    "A section counts as visible once a tenth of it is on screen.",
    "Placeholders keep the layout stable while content is in flight.",
    "Offsets are reported as they arrive, with no buffering or history.",
    "Untracked is not the same as hidden: nothing was reported yet.",
];

/// Content for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub id: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Loader {
    tx: mpsc::UnboundedSender<Loaded>,
    delay: Duration,
}

impl Loader {
    /// Create a loader and the receiver its results arrive on.
    pub fn channel(delay: Duration) -> (Self, mpsc::UnboundedReceiver<Loaded>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, delay }, rx)
    }

    /// Start loading section `id`. `seed` picks its content.
    pub fn request(&self, id: &str, seed: usize) {
        let tx = self.tx.clone();
        let delay = self.delay;
        let id = id.to_string();
        debug!("[loader] Requesting '{}'", id);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let lines = section_text(seed);
            trace!("[loader] '{}' ready ({} lines)", id, lines.len());
            // Receiver dropped = shutting down.
            let _ = tx.send(Loaded { id, lines });
        });
    }
}

/// Deterministic body text for the section at `seed`.
pub fn section_text(seed: usize) -> Vec<String> {
    let count = 2 + seed % 4;
    (0..count)
        .map(|line| PARAGRAPHS[(seed + line) % PARAGRAPHS.len()].to_string())
        .collect()
}
