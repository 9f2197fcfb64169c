//! Shared utility modules used across vecscore components.

pub mod binary_string;
pub mod varint;
