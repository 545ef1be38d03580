//! The document shown by the viewer: a column of sections whose content
//! arrives lazily.

use scrollspy::{Page, Rect, Skeleton};

/// Body lines shown by a skeleton while a section loads.
const PLACEHOLDER_LINES: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionState {
    /// Not requested yet.
    Pending,
    /// Requested, content not back yet.
    Loading,
    Loaded(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub state: SectionState,
    pub skeleton: Skeleton,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            state: SectionState::Pending,
            skeleton: Skeleton::new(PLACEHOLDER_LINES),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SectionState::Loaded(_))
    }

    /// Rows between the title and the trailing spacer.
    pub fn body_height(&self) -> u16 {
        match &self.state {
            SectionState::Loaded(lines) => u16::try_from(lines.len()).unwrap_or(u16::MAX),
            SectionState::Pending | SectionState::Loading => self.skeleton.height(),
        }
    }

    /// Title row, body, and one blank spacer row.
    pub fn height(&self) -> u16 {
        self.body_height().saturating_add(2)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// A document of `count` numbered sections, none loaded.
    pub fn numbered(count: usize) -> Self {
        let sections = (0..count)
            .map(|index| {
                Section::new(
                    format!("section-{:02}", index + 1),
                    format!("Section {}", index + 1),
                )
            })
            .collect();
        Self::new(sections)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Move a pending section to loading. Returns false for any other state.
    pub fn mark_loading(&mut self, id: &str) -> bool {
        match self.section_mut(id) {
            Some(section) if section.state == SectionState::Pending => {
                section.state = SectionState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Store loaded content. Returns false if `id` is unknown.
    pub fn set_loaded(&mut self, id: &str, lines: Vec<String>) -> bool {
        match self.section_mut(id) {
            Some(section) => {
                section.state = SectionState::Loaded(lines);
                true
            }
            None => false,
        }
    }

    pub fn loading_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|section| section.state == SectionState::Loading)
            .count()
    }

    /// Stack sections top to bottom at the given width.
    pub fn layout(&self, width: u16) -> Vec<Rect> {
        let mut y = 0u32;
        self.sections
            .iter()
            .map(|section| {
                let rect = Rect::new(0, y, width as u32, section.height() as u32);
                y += rect.height;
                rect
            })
            .collect()
    }

    /// Mirror the current layout into `page`, adding sections it does not know yet.
    pub fn sync_page(&self, page: &Page, width: u16) {
        for (section, rect) in self.sections.iter().zip(self.layout(width)) {
            if !page.set_rect(&section.id, rect) {
                page.insert(section.id.clone(), rect);
            }
        }
    }

    fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stacks_sections() {
        let mut document = Document::numbered(3);
        document.set_loaded("section-02", vec!["a".into(), "b".into()]);

        let rects = document.layout(40);
        // skeleton: heading + gap + 4 lines, plus title and spacer
        assert_eq!(rects[0], Rect::new(0, 0, 40, 8));
        assert_eq!(rects[1], Rect::new(0, 8, 40, 4));
        assert_eq!(rects[2], Rect::new(0, 12, 40, 8));
    }

    #[test]
    fn test_mark_loading_only_from_pending() {
        let mut document = Document::numbered(1);
        assert!(document.mark_loading("section-01"));
        assert!(!document.mark_loading("section-01"));
        assert_eq!(document.loading_count(), 1);

        document.set_loaded("section-01", vec![]);
        assert!(!document.mark_loading("section-01"));
        assert_eq!(document.loading_count(), 0);
    }

    #[test]
    fn test_sync_page_inserts_then_updates() {
        let document = Document::numbered(2);
        let page = Page::new(40, 10);

        document.sync_page(&page, 40);
        assert_eq!(page.element_rect("section-02"), Some(Rect::new(0, 8, 40, 8)));

        let mut document = document;
        document.set_loaded("section-01", vec!["only".into()]);
        document.sync_page(&page, 40);
        assert_eq!(page.element_rect("section-02"), Some(Rect::new(0, 3, 40, 8)));
    }
}
