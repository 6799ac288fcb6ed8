//! Application layer: controllers for the events table and the two forms.
//!
//! The table follows a unidirectional data flow:
//!
//! ```text
//! User input → Event → handle_event → TableState mutations → Actions
//!                 ↑                                             ↓
//!                 └──── completions (pages, settled search) ── TableSession
//! ```
//!
//! The forms are plain state machines with an async `submit` that goes
//! through the API traits.
//!
//! # Modules
//!
//! - [`actions`]: Side effects emitted by the table handler
//! - [`handler`]: Table events and state transitions
//! - [`table`]: Table state, columns and view model computation
//! - [`debounce`]: Cancellable search debouncer
//! - [`session`]: Async runtime executing table actions
//! - [`modes`]: Dialog or drawer presentation
//! - [`registration`]: Registration flow
//! - [`contact`]: Contact flow

pub mod actions;
pub mod contact;
pub mod debounce;
pub mod handler;
pub mod modes;
pub mod registration;
pub mod session;
pub mod table;

pub use actions::Action;
pub use contact::{ContactFlow, CONTACT_SUCCESS_MESSAGE};
pub use debounce::Debouncer;
pub use handler::{handle_event, Event};
pub use modes::{Presentation, MOBILE_BREAKPOINT_PX};
pub use registration::{
    RegistrationFlow, SubmitOutcome, REGISTRATION_SUCCESS_MESSAGE, REGISTRATION_TITLE,
};
pub use session::{EventsCache, TableSession};
pub use table::{ColumnFilter, EventColumn, Pagination, TableState};
