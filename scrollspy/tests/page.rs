use std::cell::RefCell;
use std::rc::Rc;

use scrollspy::{
    ElementLookup, IntersectionEntry, IntersectionSource, Page, Rect, ScrollOffset, ScrollSource,
    Subscription, Threshold,
};

fn record_scrolls(page: &Page) -> (Rc<RefCell<Vec<u32>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = page.subscribe_scroll(Box::new(move |offset: ScrollOffset| {
        sink.borrow_mut().push(offset.get())
    }));
    (seen, subscription)
}

fn record_intersections(
    page: &Page,
    id: &str,
    threshold: Threshold,
) -> (Rc<RefCell<Vec<IntersectionEntry>>>, Subscription) {
    let element = page.find_element(id).expect("element exists");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = page.observe_intersection(
        &element,
        threshold,
        Box::new(move |entry| sink.borrow_mut().push(entry)),
    );
    (seen, subscription)
}

// ============================================================================
// Scrolling
// ============================================================================

#[test]
fn test_scroll_is_clamped_to_content() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));

    assert_eq!(page.max_scroll(), 76);
    assert_eq!(page.scroll_to(10_000), ScrollOffset::new(76));
    assert_eq!(page.scroll_by(-500), ScrollOffset::ZERO);
}

#[test]
fn test_scroll_notifies_in_order_and_skips_noops() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));
    let (seen, _subscription) = record_scrolls(&page);

    page.scroll_to(5);
    page.scroll_to(5);
    page.scroll_by(3);
    page.scroll_to(0);

    assert_eq!(*seen.borrow(), vec![5, 8, 0]);
}

#[test]
fn test_scroll_by_extreme_delta_clamps() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));
    page.scroll_to(10);

    assert_eq!(page.scroll_by(i64::MAX), ScrollOffset::new(76));
    assert_eq!(page.scroll_by(i64::MIN), ScrollOffset::ZERO);
}

#[test]
fn test_multiple_scroll_listeners_all_notified() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));
    let (first, _a) = record_scrolls(&page);
    let (second, _b) = record_scrolls(&page);

    page.scroll_to(12);

    assert_eq!(*first.borrow(), vec![12]);
    assert_eq!(*second.borrow(), vec![12]);
}

#[test]
fn test_released_listener_not_called() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));
    let (seen, subscription) = record_scrolls(&page);

    page.scroll_to(1);
    drop(subscription);
    page.scroll_to(2);

    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(page.scroll_listener_count(), 0);
}

#[test]
fn test_listener_released_during_dispatch_is_skipped() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));

    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&victim);
    let _killer = page.subscribe_scroll(Box::new(move |_| {
        slot.borrow_mut().take();
    }));

    let (seen, subscription) = record_scrolls(&page);
    *victim.borrow_mut() = Some(subscription);

    page.scroll_to(4);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_shrinking_content_pulls_scroll_back() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));
    let (seen, _subscription) = record_scrolls(&page);
    page.scroll_to(70);

    page.set_rect("body", Rect::new(0, 0, 80, 50));

    assert_eq!(page.scroll_offset().get(), 26);
    assert_eq!(*seen.borrow(), vec![70, 26]);
}

#[test]
fn test_resize_clamps_scroll() {
    let page = Page::new(80, 24);
    page.insert("body", Rect::new(0, 0, 80, 100));
    page.scroll_to(76);

    page.resize(80, 60);

    assert_eq!(page.scroll_offset().get(), 40);
    assert_eq!(page.viewport(), Rect::new(0, 40, 80, 60));
}

// ============================================================================
// Intersections
// ============================================================================

#[test]
fn test_initial_intersection_is_reported() {
    let page = Page::new(80, 24);
    page.insert("top", Rect::new(0, 0, 80, 10));
    page.insert("bottom", Rect::new(0, 90, 80, 10));

    let (top, _a) = record_intersections(&page, "top", Threshold::DEFAULT);
    let (bottom, _b) = record_intersections(&page, "bottom", Threshold::DEFAULT);

    assert_eq!(*top.borrow(), vec![IntersectionEntry::new(1.0, true)]);
    assert_eq!(*bottom.borrow(), vec![IntersectionEntry::new(0.0, false)]);
}

#[test]
fn test_intersection_only_reported_on_threshold_crossing() {
    let page = Page::new(80, 24);
    page.insert("block", Rect::new(0, 30, 80, 20));
    page.insert("tail", Rect::new(0, 50, 80, 100));
    let (seen, _subscription) = record_intersections(&page, "block", Threshold::DEFAULT);

    // 1 of 20 rows: below 10%
    page.scroll_to(7);
    // 4 of 20 rows: 20%
    page.scroll_to(10);
    // Fully visible, still "visible": no new entry
    page.scroll_to(28);
    // Gone again
    page.scroll_to(60);

    let states: Vec<bool> = seen
        .borrow()
        .iter()
        .map(|entry| entry.is_visible(Threshold::DEFAULT))
        .collect();
    assert_eq!(states, vec![false, true, false]);
}

#[test]
fn test_moving_element_reports_intersection() {
    let page = Page::new(80, 24);
    page.insert("card", Rect::new(0, 100, 80, 10));
    let (seen, _subscription) = record_intersections(&page, "card", Threshold::DEFAULT);

    assert!(page.set_rect("card", Rect::new(0, 5, 80, 10)));
    assert!(!page.set_rect("missing", Rect::new(0, 0, 1, 1)));

    let last = *seen.borrow().last().unwrap();
    assert!(last.is_visible(Threshold::DEFAULT));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_crossing_during_nested_dispatch_is_delivered() {
    let page = Page::new(80, 10);
    page.insert("hero", Rect::new(0, 0, 80, 10));
    page.insert("tail", Rect::new(0, 10, 80, 90));

    let element = page.find_element("hero").expect("element exists");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let host = page.clone();
    let mut bounced = false;
    let subscription = page.observe_intersection(
        &element,
        Threshold::DEFAULT,
        Box::new(move |entry: IntersectionEntry| {
            let visible = entry.is_visible(Threshold::DEFAULT);
            sink.borrow_mut().push(visible);
            // Snap back to the top the first time the hero leaves the screen
            if !visible && !bounced {
                bounced = true;
                host.scroll_to(0);
            }
        }),
    );

    page.scroll_to(50);

    assert_eq!(page.scroll_offset(), ScrollOffset::ZERO);
    assert_eq!(*seen.borrow(), vec![true, false, true]);
    subscription.cancel();
}

#[test]
fn test_removed_element_observation_is_orphaned() {
    let page = Page::new(80, 24);
    page.insert("card", Rect::new(0, 30, 80, 10));
    page.insert("tail", Rect::new(0, 40, 80, 100));
    let (seen, _subscription) = record_intersections(&page, "card", Threshold::DEFAULT);

    assert!(page.remove("card"));
    page.scroll_to(30);

    assert_eq!(seen.borrow().len(), 1);
    assert!(page.find_element("card").is_none());
}

#[test]
fn test_reinserted_element_gets_new_handle() {
    let page = Page::new(80, 24);
    let first = page.insert("card", Rect::new(0, 0, 80, 10));
    let second = page.insert("card", Rect::new(0, 0, 80, 10));

    assert_ne!(first, second);
    assert_eq!(second.id(), "card");
    assert_eq!(page.find_element("card"), Some(second));
}

#[test]
fn test_dropping_page_before_subscription_is_safe() {
    let page = Page::new(80, 24);
    page.insert("card", Rect::new(0, 0, 80, 10));
    let (_seen, subscription) = record_intersections(&page, "card", Threshold::ANY);

    drop(page);
    drop(subscription);
}
