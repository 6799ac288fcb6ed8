//! Presentation layer.
//!
//! Controllers never format strings for display themselves; they expose a
//! `compute_viewmodel` method returning one of the types in [`viewmodel`].
//!
//! ```text
//! TableState / RegistrationFlow / ContactFlow → compute_viewmodel → *ViewModel → renderer
//! ```

pub mod viewmodel;

pub use viewmodel::{
    ColumnHeader, ContactViewModel, EventDetails, EventRow, RegistrationViewModel, SortIndicator,
    TableViewModel, EMPTY_TABLE_MESSAGE,
};
