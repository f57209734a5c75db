pub mod admin;
pub mod affiliate;
pub mod auth;
pub mod equipment;
pub mod lesson;
pub mod maintenance;
pub mod payment;
pub mod question;
pub mod quiz;
pub mod sponsor;
pub mod srs;
pub mod track;
pub mod webhook;
