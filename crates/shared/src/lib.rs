//! Wire-level data model shared by both sides of the polygon plugin boundary.

pub mod domain;
pub mod error;
pub mod protocol;

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
