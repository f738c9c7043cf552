//! Plain records mirroring backend collection rows, plus the small shared
//! shapes every store consumes: pagination envelopes, realtime events,
//! filter criteria, and input types with validation.
//!
//! Records carry no invariants beyond a stable `id` used as the list key;
//! relationships (service -> ordered service-songs) are kept consistent by
//! the stores, not here.

pub mod errors;

pub mod analytics;
pub mod church;
pub mod event;
pub mod notification;
pub mod page;
pub mod people;
pub mod recommendation;
pub mod service;
pub mod song;
pub mod usage;
