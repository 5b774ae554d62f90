//! Integration test crate for Reslink.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives the scripting API end to end against both backends.

#[cfg(test)]
mod scenarios;

#[cfg(test)]
mod properties;

#[cfg(test)]
mod parity;
