//! Route rankings.
//!
//! Each ranking groups the parsed routes by one key, counts the distinct
//! values of another key per group, and keeps the largest groups.

pub mod aggregate;
pub mod types;
