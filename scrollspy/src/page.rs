//! Headless document host.
//!
//! A [`Page`] holds a set of identified elements laid out in document
//! coordinates and a viewport that scrolls vertically over them. It implements
//! every host capability, so a [`ViewportTracker`](crate::ViewportTracker) can
//! run against it without a real display. Front-ends drive it by calling
//! [`Page::scroll_to`] and updating element rects after layout.
//!
//! Notifications are delivered synchronously, in registration order, after the
//! page has released its own borrow. A listener released while a dispatch is in
//! progress is skipped for the rest of that dispatch. A listener that triggers
//! a nested dispatch of its own observation hears about the result once it
//! returns.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use log::{debug, trace};

use crate::config::Threshold;
use crate::geometry::Rect;
use crate::host::{
    ElementLookup, IntersectionEntry, IntersectionListener, IntersectionSource, ScrollListener,
    ScrollSource, Subscription,
};
use crate::scroll::ScrollOffset;

/// Reference to one element of a [`Page`].
///
/// Re-inserting an identifier creates a new element with a new handle, so two
/// handles are equal only if they refer to the same insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: String,
    serial: u64,
}

impl ElementHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
struct PageElement {
    handle: ElementHandle,
    rect: Rect,
}

struct PageObservation {
    element: ElementHandle,
    threshold: Threshold,
    /// Last state reported to the listener.
    reported: Option<bool>,
    listener: Rc<RefCell<IntersectionListener>>,
}

struct PageInner {
    viewport: Rect,
    elements: HashMap<String, PageElement>,
    next_serial: u64,
    next_key: u64,
    scroll_listeners: BTreeMap<u64, Rc<RefCell<ScrollListener>>>,
    observations: BTreeMap<u64, PageObservation>,
}

impl PageInner {
    fn content_height(&self) -> u32 {
        self.elements
            .values()
            .map(|el| el.rect.bottom())
            .max()
            .unwrap_or(0)
    }

    fn max_scroll(&self) -> u32 {
        self.content_height().saturating_sub(self.viewport.height)
    }

    fn next_key(&mut self) -> u64 {
        self.next_key += 1;
        self.next_key
    }
}

/// An in-memory scrollable document. Cloning yields another handle to the same page.
#[derive(Clone)]
pub struct Page {
    inner: Rc<RefCell<PageInner>>,
}

impl Page {
    /// Create an empty page with a viewport of the given size, scrolled to the top.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PageInner {
                viewport: Rect::from_size(width, height),
                elements: HashMap::new(),
                next_serial: 0,
                next_key: 0,
                scroll_listeners: BTreeMap::new(),
                observations: BTreeMap::new(),
            })),
        }
    }

    /// Add an element, replacing any element already registered under `id`.
    ///
    /// Observations of a replaced element stop firing.
    pub fn insert(&self, id: impl Into<String>, rect: Rect) -> ElementHandle {
        let id = id.into();
        let handle = {
            let mut inner = self.inner.borrow_mut();
            inner.next_serial += 1;
            let handle = ElementHandle {
                id: id.clone(),
                serial: inner.next_serial,
            };
            let previous = inner.elements.insert(
                id.clone(),
                PageElement {
                    handle: handle.clone(),
                    rect,
                },
            );
            if previous.is_some() {
                debug!("[page] Replaced element '{}'", id);
            }
            handle
        };
        self.clamp_scroll();
        self.refresh_intersections();
        handle
    }

    /// Move or resize an existing element. Returns false if `id` is unknown.
    pub fn set_rect(&self, id: &str, rect: Rect) -> bool {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            match inner.elements.get_mut(id) {
                Some(element) if element.rect == rect => return true,
                Some(element) => {
                    element.rect = rect;
                    true
                }
                None => false,
            }
        };
        if changed {
            self.clamp_scroll();
            self.refresh_intersections();
        }
        changed
    }

    /// Remove an element. Its observations are orphaned and never fire again.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.inner.borrow_mut().elements.remove(id).is_some();
        if removed {
            debug!("[page] Removed element '{}'", id);
            self.clamp_scroll();
        }
        removed
    }

    /// Resize the viewport.
    pub fn resize(&self, width: u32, height: u32) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.viewport.width = width;
            inner.viewport.height = height;
        }
        self.clamp_scroll();
        self.refresh_intersections();
    }

    /// Scroll so the viewport's top edge is at `y`, clamped to the scrollable
    /// range. Returns the applied offset.
    pub fn scroll_to(&self, y: u32) -> ScrollOffset {
        let applied = {
            let mut inner = self.inner.borrow_mut();
            let y = y.min(inner.max_scroll());
            if y == inner.viewport.y {
                return ScrollOffset::new(y);
            }
            inner.viewport.y = y;
            ScrollOffset::new(y)
        };
        trace!("[page] Scrolled to {}", applied);
        self.notify_scroll(applied);
        self.refresh_intersections();
        applied
    }

    /// Scroll by a signed number of rows. Returns the applied offset.
    pub fn scroll_by(&self, delta: i64) -> ScrollOffset {
        let target = {
            let inner = self.inner.borrow();
            ScrollOffset::new(inner.viewport.y).offset_by(delta, inner.max_scroll())
        };
        self.scroll_to(target.get())
    }

    pub fn viewport(&self) -> Rect {
        self.inner.borrow().viewport
    }

    /// Bottom edge of the lowest element.
    pub fn content_height(&self) -> u32 {
        self.inner.borrow().content_height()
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> u32 {
        self.inner.borrow().max_scroll()
    }

    pub fn element_rect(&self, id: &str) -> Option<Rect> {
        self.inner.borrow().elements.get(id).map(|el| el.rect)
    }

    /// Fraction of the element currently inside the viewport.
    pub fn visible_ratio(&self, id: &str) -> Option<f32> {
        let inner = self.inner.borrow();
        inner
            .elements
            .get(id)
            .map(|el| el.rect.visible_ratio(&inner.viewport))
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.inner.borrow().scroll_listeners.len()
    }

    pub fn observation_count(&self) -> usize {
        self.inner.borrow().observations.len()
    }

    /// Pull the scroll offset back into range after content or viewport shrank.
    fn clamp_scroll(&self) {
        let (current, max) = {
            let inner = self.inner.borrow();
            (inner.viewport.y, inner.max_scroll())
        };
        if current > max {
            self.scroll_to(max);
        }
    }

    fn notify_scroll(&self, offset: ScrollOffset) {
        let listeners: Vec<_> = self
            .inner
            .borrow()
            .scroll_listeners
            .iter()
            .map(|(key, listener)| (*key, Rc::clone(listener)))
            .collect();

        for (key, listener) in listeners {
            if !self.inner.borrow().scroll_listeners.contains_key(&key) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener(offset),
                Err(_) => trace!("[page] Scroll listener {} busy, skipping nested delivery", key),
            }
        }
    }

    /// Re-measure every live observation and notify those whose state crossed
    /// their threshold.
    ///
    /// An observation only counts as reported once its listener has run. A
    /// crossing skipped because the listener was busy is picked up by the
    /// next pass, which runs after every pass that delivered something.
    fn refresh_intersections(&self) {
        loop {
            let pending: Vec<_> = {
                let inner = self.inner.borrow();
                inner
                    .observations
                    .iter()
                    .filter_map(|(key, observation)| {
                        let element = inner.elements.get(observation.element.id())?;
                        if element.handle != observation.element {
                            return None;
                        }
                        let entry = IntersectionEntry::measure(&element.rect, &inner.viewport);
                        let visible = entry.is_visible(observation.threshold);
                        if observation.reported == Some(visible) {
                            return None;
                        }
                        Some((*key, entry, visible, Rc::clone(&observation.listener)))
                    })
                    .collect()
            };

            let mut delivered = false;
            for (key, entry, visible, listener) in pending {
                if self.deliver_intersection(key, entry, &listener) {
                    self.mark_reported(key, visible);
                    delivered = true;
                }
            }
            if !delivered {
                break;
            }
        }
    }

    /// Run the listener for observation `key`. Returns false if the
    /// observation was released or its listener is already running.
    fn deliver_intersection(
        &self,
        key: u64,
        entry: IntersectionEntry,
        listener: &Rc<RefCell<IntersectionListener>>,
    ) -> bool {
        if !self.inner.borrow().observations.contains_key(&key) {
            return false;
        }
        match listener.try_borrow_mut() {
            Ok(mut listener) => {
                listener(entry);
                true
            }
            Err(_) => {
                trace!("[page] Observation {} busy, deferring delivery", key);
                false
            }
        }
    }

    fn mark_reported(&self, key: u64, visible: bool) {
        if let Some(observation) = self.inner.borrow_mut().observations.get_mut(&key) {
            observation.reported = Some(visible);
        }
    }
}

impl ScrollSource for Page {
    fn scroll_offset(&self) -> ScrollOffset {
        ScrollOffset::new(self.inner.borrow().viewport.y)
    }

    fn subscribe_scroll(&self, listener: ScrollListener) -> Subscription {
        let key = {
            let mut inner = self.inner.borrow_mut();
            let key = inner.next_key();
            inner
                .scroll_listeners
                .insert(key, Rc::new(RefCell::new(listener)));
            key
        };
        trace!("[page] Scroll listener {} registered", key);

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            release(&weak, |inner| {
                inner.scroll_listeners.remove(&key);
            })
        })
    }
}

impl ElementLookup for Page {
    type Element = ElementHandle;

    fn find_element(&self, id: &str) -> Option<ElementHandle> {
        self.inner
            .borrow()
            .elements
            .get(id)
            .map(|el| el.handle.clone())
    }
}

impl IntersectionSource for Page {
    fn observe_intersection(
        &self,
        element: &ElementHandle,
        threshold: Threshold,
        listener: IntersectionListener,
    ) -> Subscription {
        let listener = Rc::new(RefCell::new(listener));
        let (key, initial) = {
            let mut inner = self.inner.borrow_mut();
            let key = inner.next_key();
            let viewport = inner.viewport;
            let initial = inner
                .elements
                .get(element.id())
                .filter(|el| el.handle == *element)
                .map(|el| IntersectionEntry::measure(&el.rect, &viewport));

            inner.observations.insert(
                key,
                PageObservation {
                    element: element.clone(),
                    threshold,
                    reported: None,
                    listener: Rc::clone(&listener),
                },
            );
            (key, initial)
        };
        trace!("[page] Observation {} registered for '{}'", key, element.id());

        if let Some(entry) = initial {
            if self.deliver_intersection(key, entry, &listener) {
                self.mark_reported(key, entry.is_visible(threshold));
                // The listener may have moved things while it ran
                self.refresh_intersections();
            }
        }

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            release(&weak, |inner| {
                inner.observations.remove(&key);
            })
        })
    }
}

/// Run `f` against the page if it is still alive.
fn release(weak: &Weak<RefCell<PageInner>>, f: impl FnOnce(&mut PageInner)) {
    if let Some(inner) = weak.upgrade() {
        f(&mut inner.borrow_mut());
    }
}
