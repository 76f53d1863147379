//! Shared utilities

pub mod swc;
