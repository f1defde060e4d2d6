//! Redis-backed caching for catalog reads.

pub mod redis;
