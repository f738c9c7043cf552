//! Reactive state layer for the worship-planning UI.
//!
//! Each store holds `Reactive` fields the views watch, plus the async methods
//! that mutate them. The shared shape everywhere: set `loading`, call the API
//! seam, assign the fields on success, derive a display string into `error`
//! on failure, clear `loading`. List-backed stores additionally keep their
//! held page consistent with the backend change feed via the optimistic
//! patch protocol in [`live`].
//!
//! Stores are built explicitly via `new(...)` with injected API seams, and
//! session-wide state lives in one [`context::ChurchContext`] handed to
//! consumers; there are no module-level singletons.

pub mod analytics;
pub mod context;
pub mod live;
pub mod notifications;
pub mod pagination;
pub mod people;
pub mod reactive;
pub mod recommendations;
pub mod services;
pub mod settings;
pub mod setup;
pub mod songs;

pub use reactive::Reactive;
