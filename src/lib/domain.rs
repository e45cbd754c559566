//! Domain module

pub mod auth;
pub mod communication;
