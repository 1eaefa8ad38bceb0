//! End-to-End Tests for the Voting Engine
//!
//! This crate drives the same path the deployment drives:
//! - The browser role encrypts ballots to keys published by the engine
//! - The engine role decrypts, tallies, and commits the batch
//! - The client role verifies its own inclusion proof against the root

#[cfg(test)]
mod tests;
