pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod page;
pub mod scroll;
pub mod skeleton;
pub mod tracker;
pub mod visibility;

pub use config::{Threshold, TrackerConfig};
pub use error::ConfigError;
pub use geometry::Rect;
pub use host::{
    ElementLookup, Host, IntersectionEntry, IntersectionListener, IntersectionSource,
    ScrollListener, ScrollSource, Subscription,
};
pub use page::{ElementHandle, Page};
pub use scroll::ScrollOffset;
pub use skeleton::{Bar, BarKind, Skeleton, SkeletonStyle};
pub use tracker::ViewportTracker;
pub use visibility::{Visibility, VisibilityMap};
