#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Templated emails: compose views into HTML messages, deliver them, and
//! build signed email verification links.

pub mod domain;
pub mod infrastructure;
