//! Shared, domain-agnostic utilities reused across the `xbase` codec.

pub mod bytes;
