//! Selection container shared by single- and multi-select widgets.

/// Selection cardinality, fixed per widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one item is selected; picking replaces it.
    #[default]
    Single,
    /// Any number of items, kept in pick order without duplicates.
    Multi,
}

/// The committed choice(s) of a widget.
///
/// In single mode at most one item is held. In multi mode items are kept in
/// the order they were picked, with membership decided by `PartialEq` on the
/// host's type. Items are clones of host-supplied options; the host's own
/// list is never touched.
#[derive(Debug, Clone)]
pub struct Selection<T: Clone + PartialEq> {
    mode: SelectionMode,
    items: Vec<T>,
}

impl<T: Clone + PartialEq> Selection<T> {
    /// Empty single-mode selection.
    pub fn single() -> Self {
        Self {
            mode: SelectionMode::Single,
            items: Vec::new(),
        }
    }

    /// Empty multi-mode selection.
    pub fn multi() -> Self {
        Self {
            mode: SelectionMode::Multi,
            items: Vec::new(),
        }
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Commit an item.
    ///
    /// Single mode replaces the current item. Multi mode toggles membership:
    /// an already-selected item is removed, a new one is appended at the end.
    pub fn toggle(&mut self, item: T) {
        match self.mode {
            SelectionMode::Single => {
                self.items.clear();
                self.items.push(item);
            }
            SelectionMode::Multi => {
                if let Some(pos) = self.items.iter().position(|it| it == &item) {
                    self.items.remove(pos);
                } else {
                    self.items.push(item);
                }
            }
        }
    }

    /// Check whether an item is selected.
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|it| it == item)
    }

    /// Remove every selected item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The selected item in single mode (first item in multi mode).
    pub fn as_single(&self) -> Option<&T> {
        self.items.first()
    }

    /// All selected items, in pick order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone + PartialEq> Default for Selection<T> {
    fn default() -> Self {
        Self::single()
    }
}
