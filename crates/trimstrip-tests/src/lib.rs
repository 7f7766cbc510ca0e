//! Integration test crate for TrimStrip.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core and media crates to verify they work together.

#[cfg(test)]
mod gestures;

#[cfg(test)]
mod frames;

#[cfg(test)]
mod options;
