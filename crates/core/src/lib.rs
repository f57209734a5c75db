//! Domain logic for the Fathom training platform.
//!
//! This crate has no I/O: it holds the shared error type, id and
//! timestamp aliases, validation rules, and the pure algorithms (SRS
//! scheduling, webhook signature checks, content-audit rules) used by the
//! database and API layers.

pub mod affiliate;
pub mod course;
pub mod equipment;
pub mod error;
pub mod generation;
pub mod hashing;
pub mod integrity;
pub mod pagination;
pub mod payments;
pub mod roles;
pub mod slug;
pub mod sponsor;
pub mod srs;
pub mod types;
pub mod webhooks;
