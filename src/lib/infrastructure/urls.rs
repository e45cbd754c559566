//! URL generation

pub mod signed;
