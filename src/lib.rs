//! Core library for the grind practice tracker
//!
//! Feature modules own their models and file-backed storage; the `review`
//! module holds the spaced-repetition scheduler and `cache` the in-process
//! TTL cache used to memoize expensive LLM responses.

pub mod cache;
pub mod contests;
pub mod problems;
pub mod review;
pub mod storage;
pub mod todos;
