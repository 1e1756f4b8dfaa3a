//! Trait for items that can be offered in an autocomplete dropdown.

/// An item the host offers for selection.
///
/// The widget only ever looks at the label: it is what gets filtered against
/// the query and what is shown when no custom renderer is installed. Any
/// other fields on the item (a color, an id, a payload) are the host's
/// business and only surface through a custom row renderer.
///
/// # Example
///
/// ```
/// use awning::AutocompleteOption;
///
/// #[derive(Clone, PartialEq)]
/// struct Fruit {
///     name: String,
///     color: &'static str,
/// }
///
/// impl AutocompleteOption for Fruit {
///     fn label(&self) -> &str {
///         &self.name
///     }
/// }
/// ```
pub trait AutocompleteOption: Clone + PartialEq + Send + Sync + 'static {
    /// Display text for this item.
    ///
    /// Used for filtering and as the fallback rendering.
    fn label(&self) -> &str;
}

impl AutocompleteOption for String {
    fn label(&self) -> &str {
        self
    }
}

impl AutocompleteOption for &'static str {
    fn label(&self) -> &str {
        self
    }
}
