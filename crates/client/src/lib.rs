//! Typed client seams over the backend-as-a-service instance.
//! - `ApiError` with the shared display-message derivation used by every store.
//! - `AuthStore`: the resolved session (user, token) with change notification.
//! - `RecordService`: thin reqwest wrapper over the generic record endpoints.
//! - `RealtimeHub`: in-process fan-out of the backend change feed.
//! - `api::*`: one trait per domain, each with an HTTP impl and a mock.

pub mod api;
pub mod auth;
pub mod error;
pub mod realtime;
pub mod records;

pub use auth::{AuthState, AuthStore, AuthUser};
pub use error::ApiError;
pub use realtime::{RealtimeHub, Subscription};
pub use records::RecordService;
