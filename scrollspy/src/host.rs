//! Capabilities a host environment provides to a tracker.
//!
//! A host is whatever owns the real document: a headless [`Page`](crate::Page),
//! a terminal viewer, or a browser binding. The tracker only ever talks to it
//! through these traits, so several trackers can share one host without
//! interfering and tests can drive a host by hand.

use std::fmt;

use crate::config::Threshold;
use crate::geometry::Rect;
use crate::scroll::ScrollOffset;

/// Called with the new offset on every scroll notification.
pub type ScrollListener = Box<dyn FnMut(ScrollOffset)>;

/// Called whenever an observed element crosses its visibility threshold.
pub type IntersectionListener = Box<dyn FnMut(IntersectionEntry)>;

/// One intersection notification for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Fraction of the element's area inside the viewport.
    pub ratio: f32,
    /// Whether the element overlaps the viewport at all.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(ratio: f32, is_intersecting: bool) -> Self {
        Self {
            ratio,
            is_intersecting,
        }
    }

    /// Measure `target` against `viewport`.
    pub fn measure(target: &Rect, viewport: &Rect) -> Self {
        let ratio = target.visible_ratio(viewport);
        Self::new(ratio, ratio > 0.0)
    }

    /// Whether this entry meets `threshold`.
    pub fn is_visible(&self, threshold: Threshold) -> bool {
        self.is_intersecting && self.ratio >= threshold.get()
    }
}

/// Handle to an active registration with a host.
///
/// Dropping the handle releases the registration; once released, the host
/// never invokes the associated listener again.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the closure that undoes a registration.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// Release the registration now.
    pub fn cancel(mut self) {
        self.release_now();
    }

    /// Whether releasing this handle still has an effect.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Source of "scroll position changed" notifications.
///
/// Listeners are passive: registering one never prevents other listeners on
/// the same source from being notified.
pub trait ScrollSource {
    /// The current vertical scroll offset.
    fn scroll_offset(&self) -> ScrollOffset;

    /// Register a listener for every subsequent scroll change.
    fn subscribe_scroll(&self, listener: ScrollListener) -> Subscription;
}

/// Resolves element identifiers to elements of the host document.
pub trait ElementLookup {
    /// Host-side element reference. Two handles compare equal only when they
    /// refer to the same underlying element.
    type Element: Clone + PartialEq + fmt::Debug;

    /// Find the element currently registered under `id`.
    fn find_element(&self, id: &str) -> Option<Self::Element>;
}

/// Source of per-element viewport intersection notifications.
pub trait IntersectionSource: ElementLookup {
    /// Start watching `element`.
    ///
    /// The listener receives one entry describing the current state, then one
    /// entry each time the element crosses `threshold` in either direction.
    fn observe_intersection(
        &self,
        element: &Self::Element,
        threshold: Threshold,
        listener: IntersectionListener,
    ) -> Subscription;
}

/// Everything a [`ViewportTracker`](crate::ViewportTracker) needs from its host.
pub trait Host: ScrollSource + IntersectionSource {}

impl<T: ScrollSource + IntersectionSource + ?Sized> Host for T {}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_subscription_releases_once_on_drop() {
        let released = Rc::new(Cell::new(0));
        let counter = Rc::clone(&released);
        let subscription = Subscription::new(move || counter.set(counter.get() + 1));
        assert!(subscription.is_active());
        drop(subscription);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_subscription_cancel_releases() {
        let released = Rc::new(Cell::new(false));
        let flag = Rc::clone(&released);
        Subscription::new(move || flag.set(true)).cancel();
        assert!(released.get());
    }

    #[test]
    fn test_entry_visibility_respects_threshold() {
        let entry = IntersectionEntry::new(0.05, true);
        assert!(!entry.is_visible(Threshold::DEFAULT));
        assert!(entry.is_visible(Threshold::ANY));

        let hidden = IntersectionEntry::new(0.0, false);
        assert!(!hidden.is_visible(Threshold::ANY));
    }
}
