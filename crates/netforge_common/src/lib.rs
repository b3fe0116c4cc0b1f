//! Shared foundational helpers used across the netforge workspace.
//!
//! This crate provides bit-width arithmetic for sizing generated signals,
//! binary literal formatting, and content hashing of generated artifacts.

#![warn(missing_docs)]

pub mod hash;
pub mod width;

pub use hash::ContentHash;
pub use width::{binary_digits, clog2, decoded_width, encoded_width, select_width};
