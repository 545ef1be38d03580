use std::collections::HashMap;

/// Visibility of a single identifier as far as a tracker knows.
///
/// `Untracked` is distinct from `Hidden`: it means no intersection state has
/// been reported for the identifier, not that the element is off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Untracked,
    Hidden,
    Visible,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }

    pub fn is_tracked(self) -> bool {
        self != Visibility::Untracked
    }

    /// `None` for untracked, otherwise the boolean state.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Visibility::Untracked => None,
            Visibility::Hidden => Some(false),
            Visibility::Visible => Some(true),
        }
    }
}

impl From<Option<bool>> for Visibility {
    fn from(state: Option<bool>) -> Self {
        match state {
            None => Visibility::Untracked,
            Some(false) => Visibility::Hidden,
            Some(true) => Visibility::Visible,
        }
    }
}

/// Element identifier → "intersecting the viewport by at least the threshold".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    entries: HashMap<String, bool>,
}

impl VisibilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded state, or `None` when nothing was reported for `id`.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries.get(id).copied()
    }

    pub fn visibility(&self, id: &str) -> Visibility {
        self.get(id).into()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, visible)| (id.as_str(), *visible))
    }

    /// Identifiers currently recorded as visible.
    pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(|(id, visible)| visible.then_some(id))
    }

    /// Record `visible` for `id`. Returns true if the stored value changed.
    pub(crate) fn set(&mut self, id: &str, visible: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(current) if *current == visible => false,
            Some(current) => {
                *current = visible;
                true
            }
            None => {
                self.entries.insert(id.to_string(), visible);
                true
            }
        }
    }

    /// Forget `id`. Returns true if an entry was removed.
    pub(crate) fn clear(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }
}
