//! Turns the document and tracker state into screen rows.

use scrollspy::{Rect, ScrollOffset, Visibility, VisibilityMap};
use unicode_width::UnicodeWidthChar;

use crate::document::{Document, Section, SectionState};

const INDENT: &str = "  ";

fn marker(visibility: Visibility) -> char {
    match visibility {
        Visibility::Visible => '●',
        Visibility::Hidden => '○',
        Visibility::Untracked => '·',
    }
}

/// Truncate or pad `text` to exactly `width` display columns.
pub fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut out = String::with_capacity(width);
    let mut used = 0;

    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }

    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

/// Every row of one section, top to bottom. Always `section.height()` rows.
pub fn section_rows(
    section: &Section,
    visibility: Visibility,
    width: u16,
    frame: usize,
) -> Vec<String> {
    let mut rows = Vec::with_capacity(section.height() as usize);
    rows.push(fit(
        &format!("{} {}", marker(visibility), section.title),
        width,
    ));

    match &section.state {
        SectionState::Loaded(lines) => {
            rows.extend(lines.iter().map(|line| fit(&format!("{INDENT}{line}"), width)));
        }
        SectionState::Pending | SectionState::Loading => {
            let inner = width.saturating_sub(INDENT.len() as u16);
            rows.extend(
                section
                    .skeleton
                    .render_rows(inner, frame)
                    .into_iter()
                    .map(|row| fit(&format!("{INDENT}{row}"), width)),
            );
        }
    }

    rows.push(fit("", width));
    rows
}

/// Rows visible through `viewport`, padded with blank rows to its height.
pub fn compose(
    document: &Document,
    viewport: Rect,
    visibility: &VisibilityMap,
    frame: usize,
) -> Vec<String> {
    let width = viewport.width as u16;
    let mut rows = Vec::with_capacity(viewport.height as usize);

    for (section, rect) in document.sections().iter().zip(document.layout(width)) {
        if rect.bottom() <= viewport.top() || rect.top() >= viewport.bottom() {
            continue;
        }
        let section_rows = section_rows(section, visibility.visibility(&section.id), width, frame);
        for (offset, row) in section_rows.into_iter().enumerate() {
            let y = rect.y + offset as u32;
            if y >= viewport.top() && y < viewport.bottom() {
                rows.push(row);
            }
        }
    }

    while rows.len() < viewport.height as usize {
        rows.push(fit("", width));
    }
    rows
}

/// One-line summary shown under the document.
pub fn status_line(
    offset: ScrollOffset,
    max_scroll: u32,
    visibility: &VisibilityMap,
    loading: usize,
    width: u16,
) -> String {
    let mut visible: Vec<&str> = visibility.visible_ids().collect();
    visible.sort_unstable();
    let visible = if visible.is_empty() {
        "none".to_string()
    } else {
        visible.join(", ")
    };

    let loading = if loading > 0 {
        format!("  loading {loading}")
    } else {
        String::new()
    };

    fit(
        &format!(" {offset}/{max_scroll}  visible: {visible}{loading}  [j/k PgUp/PgDn Home/End q]"),
        width,
    )
}

#[cfg(test)]
mod tests {
    use scrollspy::{Page, ViewportTracker};

    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        // Wide characters never split across the edge
        assert_eq!(fit("日本", 3), "日 ");
    }

    #[test]
    fn test_section_rows_match_height() {
        let mut document = Document::numbered(2);
        document.set_loaded("section-01", vec!["hello".into(), "world".into()]);

        for section in document.sections() {
            let rows = section_rows(section, Visibility::Untracked, 30, 0);
            assert_eq!(rows.len(), section.height() as usize);
            assert!(rows.iter().all(|row| row.chars().count() == 30));
        }
    }

    #[test]
    fn test_section_rows_show_marker_and_skeleton() {
        let document = Document::numbered(1);
        let rows = section_rows(&document.sections()[0], Visibility::Visible, 30, 0);

        assert!(rows[0].starts_with("● Section 1"));
        assert!(rows[1].starts_with("  ░"));
    }

    #[test]
    fn test_compose_clips_to_viewport() {
        let mut document = Document::numbered(2);
        document.set_loaded("section-01", vec!["first".into(), "second".into()]);

        // section-01 occupies rows 0..4, section-02 starts at row 4
        let rows = compose(&document, Rect::new(0, 2, 20, 3), &VisibilityMap::new(), 0);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], fit("  second", 20));
        assert_eq!(rows[1], fit("", 20));
        assert_eq!(rows[2], fit("· Section 2", 20));
    }

    #[test]
    fn test_compose_pads_short_documents() {
        let document = Document::new(Vec::new());
        let rows = compose(&document, Rect::new(0, 0, 10, 4), &VisibilityMap::new(), 0);
        assert_eq!(rows, vec![fit("", 10); 4]);
    }

    #[test]
    fn test_status_line_without_visible_sections() {
        let status = status_line(ScrollOffset::new(7), 40, &VisibilityMap::new(), 2, 80);
        assert!(status.starts_with(" 7/40  visible: none  loading 2"));
    }

    #[test]
    fn test_status_line_lists_visible_sections() {
        let page = Page::new(80, 20);
        page.insert("section-02", Rect::new(0, 0, 80, 10));
        page.insert("section-01", Rect::new(0, 10, 80, 10));
        page.insert("section-03", Rect::new(0, 50, 80, 10));

        let mut tracker = ViewportTracker::new(page.clone());
        for id in ["section-03", "section-02", "section-01"] {
            tracker.observe(id);
        }

        let status = status_line(
            tracker.scroll_offset(),
            page.max_scroll(),
            &tracker.visibility_map(),
            0,
            120,
        );
        assert!(status.starts_with(" 0/40  visible: section-01, section-02  ["));
    }
}
