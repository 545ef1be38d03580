/// Axis-aligned rectangle in document coordinates.
///
/// `y` grows downwards from the top of the document, so a viewport scrolled by
/// `n` rows is `Rect::new(0, n, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn left(&self) -> u32 {
        self.x
    }

    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub const fn top(&self) -> u32 {
        self.y
    }

    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Same size, moved to a new top edge.
    pub const fn with_y(self, y: u32) -> Self {
        Self { y, ..self }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlapping region of two rectangles, or `None` if they share no area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Fraction of this rectangle's area that lies inside `viewport`, in `[0.0, 1.0]`.
    ///
    /// A zero-area rectangle counts as fully visible when its origin sits inside
    /// the viewport (edges inclusive), and invisible otherwise.
    pub fn visible_ratio(&self, viewport: &Rect) -> f32 {
        if self.is_empty() {
            let inside = self.x >= viewport.left()
                && self.x <= viewport.right()
                && self.y >= viewport.top()
                && self.y <= viewport.bottom();
            return if inside { 1.0 } else { 0.0 };
        }

        match self.intersection(viewport) {
            Some(overlap) => (overlap.area() as f64 / self.area() as f64) as f32,
            None => 0.0,
        }
    }
}
