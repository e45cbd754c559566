//! Infrastructure module

pub mod clock;
pub mod config;
pub mod email;
pub mod templates;
pub mod urls;
