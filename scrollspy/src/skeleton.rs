//! Loading placeholders.
//!
//! A [`Skeleton`] stands in for content that has not arrived yet: a heading
//! bar followed by body bars of varying width. It holds no state beyond its
//! styling and renders the same rows for the same inputs.

/// Relative widths of successive body bars, in percent of the available width.
const LINE_WIDTHS: [u32; 4] = [100, 92, 96, 84];
const HEADING_WIDTH: u32 = 40;
const LAST_LINE_WIDTH: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    Heading,
    Line,
}

/// One placeholder bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub kind: BarKind,
    pub width: u16,
}

/// Styling for a skeleton placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonStyle {
    /// Glyph used to draw bars.
    pub fill: char,
    /// Glyph used on pulse frames.
    pub pulse_fill: char,
    /// Alternate between `fill` and `pulse_fill` from frame to frame.
    pub pulse: bool,
    /// Draw a heading bar above the body.
    pub heading: bool,
    /// Blank rows between the heading and the body.
    pub gap: u16,
}

impl Default for SkeletonStyle {
    fn default() -> Self {
        Self {
            fill: '░',
            pulse_fill: '▒',
            pulse: true,
            heading: true,
            gap: 1,
        }
    }
}

impl SkeletonStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }

    pub fn pulse(mut self, pulse: bool) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn heading(mut self, heading: bool) -> Self {
        self.heading = heading;
        self
    }

    pub fn gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }
}

/// Placeholder for a block of text that is still loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skeleton {
    lines: u16,
    style: SkeletonStyle,
}

impl Skeleton {
    /// A placeholder with `lines` body bars.
    pub fn new(lines: u16) -> Self {
        Self {
            lines,
            style: SkeletonStyle::default(),
        }
    }

    pub fn style(mut self, style: SkeletonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn lines(&self) -> u16 {
        self.lines
    }

    /// Rows occupied when rendered, saturating at `u16::MAX`.
    pub fn height(&self) -> u16 {
        if self.style.heading {
            self.lines.saturating_add(1).saturating_add(self.style.gap)
        } else {
            self.lines
        }
    }

    /// Bars laid out for a given width. The final body bar is always shorter
    /// so the block reads as a paragraph.
    pub fn bars(&self, width: u16) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(self.lines as usize + 1);
        if self.style.heading {
            bars.push(Bar {
                kind: BarKind::Heading,
                width: percent_of(width, HEADING_WIDTH),
            });
        }

        for line in 0..self.lines {
            let percent = if line + 1 == self.lines {
                LAST_LINE_WIDTH
            } else {
                LINE_WIDTHS[line as usize % LINE_WIDTHS.len()]
            };
            bars.push(Bar {
                kind: BarKind::Line,
                width: percent_of(width, percent),
            });
        }

        bars
    }

    /// Render to text rows exactly `width` columns wide.
    ///
    /// `frame` selects the pulse phase when pulsing is enabled.
    pub fn render_rows(&self, width: u16, frame: usize) -> Vec<String> {
        let glyph = if self.style.pulse && frame % 2 == 1 {
            self.style.pulse_fill
        } else {
            self.style.fill
        };

        let mut rows = Vec::with_capacity(self.height() as usize);
        for bar in self.bars(width) {
            rows.push(bar_row(glyph, bar.width, width));
            if bar.kind == BarKind::Heading {
                for _ in 0..self.style.gap {
                    rows.push(" ".repeat(width as usize));
                }
            }
        }
        rows
    }
}

fn percent_of(width: u16, percent: u32) -> u16 {
    (width as u32 * percent / 100) as u16
}

fn bar_row(glyph: char, filled: u16, width: u16) -> String {
    let mut row = String::with_capacity(width as usize * glyph.len_utf8());
    row.extend(std::iter::repeat_n(glyph, filled as usize));
    row.extend(std::iter::repeat_n(' ', width.saturating_sub(filled) as usize));
    row
}
