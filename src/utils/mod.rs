//! Utility modules for the docs builder.

pub mod log;
