//! Domain types shared by the alert engine, the notification dispatcher and
//! the HTTP service.

pub mod types;
