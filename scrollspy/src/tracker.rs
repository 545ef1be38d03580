//! Scroll offset and per-element visibility tracking.
//!
//! A [`ViewportTracker`] subscribes to its host's scroll notifications when it
//! is created and keeps one intersection subscription per observed element.
//! All state lives behind an `Rc<RefCell<..>>` shared with the listeners it
//! hands to the host; no borrow is ever held across a call into the host, so
//! hosts are free to notify synchronously from inside a registration.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

use crate::config::{Threshold, TrackerConfig};
use crate::host::{Host, IntersectionListener, ScrollListener, Subscription};
use crate::scroll::ScrollOffset;
use crate::visibility::{Visibility, VisibilityMap};

/// State shared between the tracker and the listeners registered with the host.
#[derive(Debug, Default)]
struct TrackerState {
    scroll_offset: ScrollOffset,
    visibility: VisibilityMap,
    /// Live observation generation per identifier. Listeners carrying any
    /// other generation are stale and ignored.
    generations: HashMap<String, u64>,
    next_generation: u64,
    scroll_subscribed: bool,
    changed: bool,
}

impl TrackerState {
    fn set_scroll_offset(&mut self, offset: ScrollOffset) {
        if self.scroll_offset != offset {
            self.scroll_offset = offset;
            self.changed = true;
        }
    }

    fn set_visibility(&mut self, id: &str, visible: bool) {
        if self.visibility.set(id, visible) {
            self.changed = true;
        }
    }

    fn begin_observation(&mut self, id: &str) -> u64 {
        self.next_generation += 1;
        self.generations.insert(id.to_string(), self.next_generation);
        self.next_generation
    }
}

/// A live observation of one element.
struct Observation<E> {
    element: E,
    // Held for its Drop: releasing it stops host notifications.
    _subscription: Subscription,
}

/// Tracks the current scroll offset and which registered elements are in view.
///
/// # Example
///
/// ```
/// use scrollspy::{Page, Rect, ViewportTracker, Visibility};
///
/// let page = Page::new(80, 100);
/// page.insert("hero", Rect::new(0, 170, 80, 100));
///
/// let mut tracker = ViewportTracker::new(page.clone());
/// tracker.observe("hero");
/// assert_eq!(tracker.visibility("hero"), Visibility::Hidden);
///
/// page.scroll_to(120);
/// assert_eq!(tracker.scroll_offset().get(), 120);
/// assert_eq!(tracker.visibility("hero"), Visibility::Visible);
/// ```
pub struct ViewportTracker<H: Host> {
    host: H,
    config: TrackerConfig,
    state: Rc<RefCell<TrackerState>>,
    scroll_subscription: Option<Subscription>,
    observations: HashMap<String, Observation<H::Element>>,
}

impl<H: Host> ViewportTracker<H> {
    /// Create a tracker with the default 10% visibility threshold.
    pub fn new(host: H) -> Self {
        Self::with_config(host, TrackerConfig::default())
    }

    /// Create a tracker and subscribe to the host's scroll notifications.
    pub fn with_config(host: H, config: TrackerConfig) -> Self {
        let state = Rc::new(RefCell::new(TrackerState {
            scroll_offset: host.scroll_offset(),
            scroll_subscribed: true,
            ..Default::default()
        }));

        let scroll_subscription = host.subscribe_scroll(scroll_listener(Rc::downgrade(&state)));
        debug!(
            "[tracker] Subscribed to scroll (offset {}, threshold {})",
            state.borrow().scroll_offset,
            config.threshold
        );

        Self {
            host,
            config,
            state,
            scroll_subscription: Some(scroll_subscription),
            observations: HashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The most recently reported scroll offset.
    pub fn scroll_offset(&self) -> ScrollOffset {
        self.state.borrow().scroll_offset
    }

    /// Snapshot of the visibility map.
    pub fn visibility_map(&self) -> VisibilityMap {
        self.state.borrow().visibility.clone()
    }

    /// Visibility of one identifier.
    pub fn visibility(&self, id: &str) -> Visibility {
        self.state.borrow().visibility.visibility(id)
    }

    /// Whether the tracker is still subscribed (i.e. not torn down).
    pub fn is_active(&self) -> bool {
        self.scroll_subscription.is_some()
    }

    /// Whether `id` currently has a live observation.
    pub fn is_observing(&self, id: &str) -> bool {
        self.observations.contains_key(id)
    }

    /// Identifiers with a live observation, in no particular order.
    pub fn observed_ids(&self) -> impl Iterator<Item = &str> {
        self.observations.keys().map(String::as_str)
    }

    /// Return whether any tracked value changed since the last call, and reset
    /// the flag.
    pub fn take_changed(&self) -> bool {
        std::mem::take(&mut self.state.borrow_mut().changed)
    }

    /// Start watching the element registered under `id`.
    ///
    /// Does nothing if the host has no such element. Observing an identifier
    /// that is already observed releases the previous observation first; if
    /// the identifier now names a different element, its old visibility value
    /// is dropped until the new observation reports.
    pub fn observe(&mut self, id: &str) {
        if !self.is_active() {
            warn!("[tracker] observe('{}') after teardown ignored", id);
            return;
        }

        let Some(element) = self.host.find_element(id) else {
            debug!("[tracker] No element '{}', not observing", id);
            return;
        };

        if let Some(previous) = self.observations.remove(id) {
            let replaced = previous.element != element;
            drop(previous);
            if replaced {
                let mut state = self.state.borrow_mut();
                if state.visibility.clear(id) {
                    state.changed = true;
                    debug!("[tracker] '{}' now names a different element, cleared", id);
                }
            }
            debug!("[tracker] Re-observing '{}'", id);
        } else {
            debug!("[tracker] Observing '{}'", id);
        }

        let generation = self.state.borrow_mut().begin_observation(id);
        let listener = intersection_listener(
            Rc::downgrade(&self.state),
            id.to_string(),
            generation,
            self.config.threshold,
        );
        let subscription = self
            .host
            .observe_intersection(&element, self.config.threshold, listener);

        self.observations.insert(
            id.to_string(),
            Observation {
                element,
                _subscription: subscription,
            },
        );
    }

    /// Stop watching `id`. The last reported value stays in the map.
    ///
    /// Returns true if an observation was released.
    pub fn unobserve(&mut self, id: &str) -> bool {
        self.state.borrow_mut().generations.remove(id);
        let released = self.observations.remove(id).is_some();
        if released {
            debug!("[tracker] Released '{}'", id);
        }
        released
    }

    /// Release every subscription. The tracker keeps its last values but never
    /// changes again.
    pub fn teardown(&mut self) {
        let Some(scroll_subscription) = self.scroll_subscription.take() else {
            return;
        };

        {
            let mut state = self.state.borrow_mut();
            state.scroll_subscribed = false;
            state.generations.clear();
        }

        scroll_subscription.cancel();
        let released = self.observations.len();
        self.observations.clear();
        debug!("[tracker] Torn down ({} observation(s) released)", released);
    }
}

impl<H: Host> Drop for ViewportTracker<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn scroll_listener(state: Weak<RefCell<TrackerState>>) -> ScrollListener {
    Box::new(move |offset| {
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut state = state.borrow_mut();
        if !state.scroll_subscribed {
            return;
        }
        trace!("[tracker] Scroll {}", offset);
        state.set_scroll_offset(offset);
    })
}

fn intersection_listener(
    state: Weak<RefCell<TrackerState>>,
    id: String,
    generation: u64,
    threshold: Threshold,
) -> IntersectionListener {
    Box::new(move |entry| {
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut state = state.borrow_mut();
        if state.generations.get(&id) != Some(&generation) {
            trace!("[tracker] Stale notification for '{}' dropped", id);
            return;
        }
        let visible = entry.is_visible(threshold);
        trace!(
            "[tracker] '{}' ratio {:.2} -> {}",
            id,
            entry.ratio,
            if visible { "visible" } else { "hidden" }
        );
        state.set_visibility(&id, visible);
    })
}
