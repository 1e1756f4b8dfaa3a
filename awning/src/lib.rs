//! awning - autocomplete text input with a filtered dropdown panel for
//! terminal UIs.
//!
//! The base widget ([`Autocomplete`]) owns the query text, open/closed
//! state, the filtered list, keyboard navigation and the committed
//! selection (single or multi). [`Debounced`] wraps it to delay
//! `on_input_change` delivery by a quiet period. Hosts drive widgets from
//! their own event loop and render them into a ratatui frame.

pub mod debounce;
pub mod events;
pub mod filter;
pub mod option;
pub mod overlay;
pub mod render;
pub mod selection;
pub mod state;

pub use debounce::{DEFAULT_DELAY, Debounced};
pub use events::EventResult;
pub use filter::{FilterFn, FilterMatch, fuzzy_filter, substring_filter};
pub use option::AutocompleteOption;
pub use selection::{Selection, SelectionMode};
pub use state::{
    Autocomplete, AutocompleteId, ChangeHandler, InputChangeHandler, OptionRenderer,
};

pub mod prelude {
    pub use crate::debounce::Debounced;
    pub use crate::events::EventResult;
    pub use crate::filter::{FilterFn, FilterMatch, fuzzy_filter, substring_filter};
    pub use crate::option::AutocompleteOption;
    pub use crate::selection::{Selection, SelectionMode};
    pub use crate::state::{Autocomplete, AutocompleteId};
}
