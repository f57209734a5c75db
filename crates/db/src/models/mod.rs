//! Row structs and request DTOs, one module per area of the platform.
//!
//! Rows derive `FromRow` (and `Serialize` unless they carry secrets such as
//! the password hash). `Create*` inputs hold required fields; `Update*`
//! inputs are all-`Option` patches applied with `COALESCE`.

pub mod affiliate;
pub mod equipment;
pub mod lesson;
pub mod payment_event;
pub mod quiz;
pub mod sponsor;
pub mod srs;
pub mod track;
pub mod user;
