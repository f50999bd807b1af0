//! CLI library for testing purposes

pub mod validation;
